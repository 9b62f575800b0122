use linepack_sim::evolution::MutationModel;
use linepack_sim::simulation::{Configuration, CoverageStats, InitializationConfig};

pub fn print_parameters(config: &Configuration) {
    let exec = &config.execution;
    let selection = &config.evolution.selection;
    let mutation = &config.evolution.mutation;
    let bounds = &config.evolution.segment_bounds;

    println!("\n📋 Simulation Configuration");
    println!("  • Communities: {} [-n, --communities]", exec.number_of_communities);
    println!("  • Community Size: {} [-s, --community-size]", exec.size_of_community);
    println!("  • Generations: {} [-g, --generations]", exec.total_generations);
    println!("  • Packing Attempts: {} [-a, --attempts]", exec.max_packing_attempts);
    println!("  • Snapshot Interval: {} [--snapshot-every]", exec.snapshot_every);
    if let Some(seed) = exec.seed {
        println!("  • Random Seed: {seed} [--seed]");
    } else {
        println!("  • Random Seed: Random [--seed]");
    }

    println!("\n📏 Starting Communities");
    match &config.initialization {
        InitializationConfig::Uniform {
            min_length,
            max_length,
        } => println!("  • Uniform: lengths in [{min_length}, {max_length}]"),
        InitializationConfig::Homogeneous { length } => {
            println!("  • Homogeneous: every length {length}")
        }
        InitializationConfig::NMember {
            lengths,
            proportions,
        } => {
            println!("  • N-member:");
            for (length, proportion) in lengths.iter().zip(proportions) {
                println!("    - {length} × {proportion}");
            }
        }
        InitializationConfig::Import { path } => {
            println!("  • Imported from {}", path.display())
        }
    }

    println!("\n🎯 Selection");
    println!(
        "  • Regime: {} (community: {}, individual: {})",
        selection.regime_label(),
        selection.community_level,
        selection.individual_level
    );
    println!("  • Individual Weighting: {} [--weighting]", selection.individual_weighting);

    println!("\n⚡ Mutation Parameters");
    println!("  • Probability: {} [--mutation-probability]", mutation.probability);
    println!("  • Size Range: [{}, {}]", mutation.min_size, mutation.max_size);
    match mutation.model {
        MutationModel::Uniform => println!("  • Model: uniform"),
        MutationModel::Poisson { mean } => println!("  • Model: poisson (mean {mean})"),
        MutationModel::Normal { std_dev, delta } => {
            println!("  • Model: normal (σ {std_dev}, Δ {delta})")
        }
    }
    println!("  • Surviving Range: [{}, {}]", bounds.min, bounds.max);
    println!();
}

pub fn print_coverage_stats(trials: usize, stats: &CoverageStats) {
    println!("\n📊 Coverage over {trials} communities");
    println!("  • Mean: {:.6}", stats.mean);
    println!("  • Std Dev: {:.6}", stats.std_dev);
    println!("  • Min: {:.6}", stats.min);
    println!("  • Max: {:.6}", stats.max);
}
