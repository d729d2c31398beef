use clap::{App, Arg, ArgMatches};
use env_logger::Builder;
use log::LevelFilter;

pub fn build_app<'a, 'b>() -> App<'a, 'b> {
    App::new("haplotypecaller")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Local-reassembly short variant caller (SNVs and small indels) for aligned sequencing reads")
        .arg(
            Arg::with_name("input")
                .short("I")
                .long("input")
                .value_name("BAM")
                .help("Indexed BAM file containing the aligned reads")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("output")
                .short("O")
                .long("output")
                .value_name("VCF")
                .help("Path the called variants are written to")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("reference")
                .short("R")
                .long("reference")
                .value_name("FASTA")
                .help("Reference FASTA file (first record is used)")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Print extra debugging information"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .help("Unless there is an error, do not print log messages"),
        )
}

pub fn set_log_level(matches: &ArgMatches) {
    let mut log_level = LevelFilter::Info;
    if matches.is_present("verbose") {
        log_level = LevelFilter::Debug;
    }
    if matches.is_present("quiet") {
        log_level = LevelFilter::Error;
    }
    let mut builder = Builder::new();
    builder.filter_level(log_level);
    if let Ok(env_directives) = std::env::var("RUST_LOG") {
        builder.parse_filters(&env_directives);
    }
    if builder.try_init().is_err() {
        panic!("Failed to set log level - has it been set twice?");
    }
}
