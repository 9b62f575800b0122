use chrono::Local;
use linepack_sim::simulation::Configuration;

/// Run label shared by every output file of one run, ending in a
/// `%Y%m%d_%H%M%S` timestamp.
pub fn run_label(config: &Configuration) -> String {
    format!(
        "{}_{}",
        config.run_label_prefix(),
        Local::now().format("%Y%m%d_%H%M%S")
    )
}
