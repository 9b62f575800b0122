use anyhow::{Context, Result};
use linepack_sim::evolution::{MutationConfig, MutationModel, SelectionConfig};
use linepack_sim::simulation::{
    CommunityKind, Configuration, EvolutionConfig, ExecutionConfig, InitializationConfig,
    SegmentBounds,
};

use crate::args::InitArgs;
use crate::printing::print_parameters;

pub fn init_simulation(args: &InitArgs) -> Result<()> {
    println!("📏 Linepack - Community Packing Simulator");
    println!("============================================\n");

    let config = build_config(args)?;
    config.validate().context("Invalid configuration")?;

    print_parameters(&config);

    config
        .to_json_file(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("✓ Configuration written to {}", args.output.display());
    println!(
        "\n💡 Use 'linepack run --config {}' to start the simulation",
        args.output.display()
    );
    Ok(())
}

pub fn build_config(args: &InitArgs) -> Result<Configuration> {
    let mut execution = ExecutionConfig::new(args.communities, args.community_size, args.generations);
    execution.max_packing_attempts = args.attempts;
    execution.snapshot_every = args.snapshot_every;
    execution.seed = args.seed;

    let model = match args.mutation_type {
        MutationModel::Uniform => MutationModel::Uniform,
        MutationModel::Poisson { .. } => MutationModel::Poisson {
            mean: args.mutation_mean,
        },
        MutationModel::Normal { .. } => MutationModel::Normal {
            std_dev: args.mutation_std_dev,
            delta: args.mutation_delta,
        },
    };

    let evolution = EvolutionConfig {
        selection: SelectionConfig {
            community_level: args.community_selection,
            individual_level: args.individual_selection,
            individual_weighting: args.weighting,
        },
        mutation: MutationConfig {
            probability: args.mutation_probability,
            min_size: args.min_mutation_size,
            max_size: args.max_mutation_size,
            model,
        },
        segment_bounds: SegmentBounds {
            min: args.min_segment_size,
            max: args.max_segment_size,
        },
    };

    let initialization = match args.community_type {
        CommunityKind::Uniform => InitializationConfig::Uniform {
            min_length: args.min_length,
            max_length: args.max_length,
        },
        CommunityKind::Homogeneous => InitializationConfig::Homogeneous {
            length: args.length,
        },
        CommunityKind::NMember => InitializationConfig::NMember {
            lengths: args.lengths.clone(),
            proportions: args.proportions.clone(),
        },
        CommunityKind::Import => InitializationConfig::Import {
            path: args
                .seed_csv
                .clone()
                .context("--seed-csv is required for imported communities")?,
        },
    };

    Ok(Configuration::new(execution, evolution, initialization))
}
