use haplotypecaller::cli;
use haplotypecaller::haplotype::haplotype_caller_engine::HaplotypeCallerEngine;
use log::error;
use std::process;

fn main() {
    let matches = cli::build_app().get_matches();
    cli::set_log_level(&matches);

    let engine = HaplotypeCallerEngine::new(
        matches.value_of("input").unwrap(),
        matches.value_of("reference").unwrap(),
        matches.value_of("output").unwrap(),
    );

    if let Err(error) = engine.call_variants() {
        error!("{}", error);
        process::exit(1);
    }
}
