use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rayon::prelude::*;

use hpo_lr::case::CaseBuilder;
use hpo_lr::genotype::{BackgroundFrequencies, GenotypeEvidence, PathogenicityBin, Variant};
use hpo_lr::{DiagnosisRanker, Disease, DiseaseAnnotations, DiseaseId, GeneId, HpoCase, Ontology};

const N_TERMS: u32 = 5_000;
const N_DISEASES: u32 = 2_000;

/// A binary tree of terms where every third term has a second parent
fn synthetic_ontology() -> Ontology {
    let mut ontology = Ontology::default();
    for id in 1..=N_TERMS {
        ontology.insert_term(format!("Term {id}"), id);
    }
    for id in 2..=N_TERMS {
        ontology.add_parent(id / 2, id).expect("terms exist");
        if id % 3 == 0 && id / 3 > 1 && id / 3 != id / 2 {
            ontology.add_parent(id / 3, id).expect("terms exist");
        }
    }
    ontology.create_cache();
    ontology
}

fn synthetic_diseases() -> DiseaseAnnotations {
    (1..=N_DISEASES)
        .map(|d| {
            let mut disease = Disease::new(DiseaseId::omim(d), "Disease");
            for j in 0..12 {
                let term = (d * 37 + j * 101) % (N_TERMS - 1) + 2;
                let frequency = f64::from(j % 4 + 1) / 4.0;
                disease.add_term(term, Some(frequency)).expect("valid frequency");
            }
            disease.add_gene(GeneId::from(d % 500 + 1));
            disease
        })
        .collect()
}

fn synthetic_evidence() -> GenotypeEvidence {
    let mut background = BackgroundFrequencies::new();
    for gene in 1..=500u32 {
        let frequency = 0.0001 * f64::from(gene % 7 + 1);
        background.insert(GeneId::from(gene), PathogenicityBin::Pathogenic, frequency);
    }
    let mut evidence = GenotypeEvidence::new(background);
    for gene in (1..=500u32).step_by(50) {
        let variant = Variant::new(GeneId::from(gene), 0.95, 0.0001, 2).expect("valid variant");
        evidence.add_variant("GENE", variant);
    }
    evidence
}

fn case(seed: u32) -> HpoCase {
    let mut builder = CaseBuilder::new();
    for j in 0..6 {
        builder = builder.present((seed * 53 + j * 211) % (N_TERMS - 1) + 2);
    }
    builder
        .excluded((seed * 17) % (N_TERMS - 1) + 2)
        .candidates((1..=N_DISEASES).map(DiseaseId::omim))
        .build()
        .expect("valid case")
}

fn ranking_benchmark(c: &mut Criterion) {
    let mut ontology = synthetic_ontology();
    let diseases = synthetic_diseases();
    ontology.calculate_information_content(&diseases);
    let evidence = synthetic_evidence();

    let phenotype = DiagnosisRanker::new(&ontology, &diseases);
    let genotype = DiagnosisRanker::new(&ontology, &diseases).with_genotype(&evidence);

    c.bench_function("rank phenotype", |b| {
        let mut case = case(1);
        b.iter(|| phenotype.rank(black_box(&mut case)).expect("valid case").len())
    });

    c.bench_function("rank genotype", |b| {
        let mut case = case(1);
        b.iter(|| genotype.rank(black_box(&mut case)).expect("valid case").len())
    });

    c.bench_function("rank 16 cases parallel", |b| {
        let mut cases: Vec<HpoCase> = (0..16).map(case).collect();
        b.iter(|| {
            cases
                .par_iter_mut()
                .map(|case| genotype.rank(case).expect("valid case")[0].rank())
                .sum::<usize>()
        })
    });
}

criterion_group! {
    name = ranking;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(10));
    targets = ranking_benchmark
}
criterion_main!(ranking);
