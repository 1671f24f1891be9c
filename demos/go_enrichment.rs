use std::process;

use obogo::parser::gaf;
use obogo::stats::ora::score_all;
use obogo::stats::Normalization;
use obogo::{Annotated, Entity, OboResult, Ontology, PercolateMode, Population};

/// Splits a comma separated list of entity ids
fn id_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn run(args: &[String]) -> OboResult<()> {
    let obo = args.get(1).map_or("tests/small.obo", String::as_str);
    let annotations = args.get(2).map_or("tests/small.gaf", String::as_str);
    let measured = args.get(3).map_or_else(
        || id_list("P00001,P00002,P00003,P00004"),
        |value| id_list(value),
    );
    let abundant = args
        .get(4)
        .map_or_else(|| id_list("P00002,P00003"), |value| id_list(value));
    let normalization: Normalization = args
        .get(5)
        .map_or("background", String::as_str)
        .parse()?;

    let mut ontology = Ontology::from_obo(obo)?;
    println!("{:?}", ontology);

    let entities = gaf::parse(annotations)?;
    let summary = ontology.load(Population::Background, &entities);
    println!("Background: {:?}", summary);

    let measured_entities: Vec<&Entity> = entities
        .iter()
        .filter(|entity| measured.iter().any(|id| id == entity.entity_id().as_str()))
        .collect();
    let summary = ontology.load(Population::Measured, measured_entities);
    println!("Measured: {:?}", summary);

    ontology.percolate(PercolateMode::Both);

    let mut enrichments = score_all(&ontology, &abundant, normalization)?;
    enrichments.sort_by(|a, b| {
        a.pvalue()
            .partial_cmp(&b.pvalue())
            .expect("p-values are never NaN")
    });

    println!("\nid\tname\tcount\todds ratio\tp-value\ttable");
    for enrichment in &enrichments {
        println!(
            "{}\t{}\t{}\t{}\t{:e}\t{}",
            enrichment.id(),
            enrichment.name(),
            enrichment.count(),
            enrichment.odds_ratio(),
            enrichment.pvalue(),
            enrichment.table()
        );
    }
    Ok(())
}

fn main() {
    simple_logger::init_with_env().expect("logger can only be initialized once");

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        println!("Show enriched GO terms\n\n");
        println!("Usage\ngo_enrichment <OBO> <GAF> <MEASURED IDS> <ABUNDANT IDS> <background|measured>");
        println!("\ngo_enrichment tests/small.obo tests/small.gaf P00001,P00002,P00003 P00002 measured\n");
        println!("Set RUST_LOG=debug to see log messages");
        process::exit(1)
    }

    if let Err(err) = run(&args) {
        eprintln!("{err}");
        process::exit(1)
    }
}
