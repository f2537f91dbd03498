//! Small in-memory ontology and annotations shared by the unit tests
//!
//! ```text
//! HP:0000001 All (0.0)
//! └── HP:0000118 Phenotypic abnormality (0.0)
//!     ├── HP:0000707 Abnormality of the nervous system (1.0)
//!     │   ├── HP:0012639 Abnormal nervous system morphology (1.5)
//!     │   │   └── HP:0002011 Morphological central nervous system abnormality (2.0)
//!     │   │       └── HP:0012443 Abnormality of brain morphology (2.5)
//!     │   │           └── HP:0100547 Abnormal forebrain morphology (3.0)
//!     │   └── HP:0012638 Abnormal nervous system physiology (1.5)
//!     │       └── HP:0012285 (3.5)
//!     ├── HP:0000818 Abnormality of the endocrine system (1.2)
//!     │   └── HP:0000864 Abnormality of the hypothalamus-pituitary axis (2.2)
//!     │       └── HP:0012285 Abnormal hypothalamus physiology (3.5)
//!     └── HP:0002715 Abnormality of the immune system (1.1)
//!         └── HP:0010978 Abnormality of immune system physiology (1.8)
//! ```
use crate::annotations::{Disease, DiseaseAnnotations, DiseaseId, GeneId};
use crate::genotype::{
    BackgroundFrequencies, GeneVariantBundle, GenotypeEvidence, PathogenicityBin, Variant,
};
use crate::Ontology;

const TERMS: [(u32, &str, f64); 13] = [
    (1, "All", 0.0),
    (118, "Phenotypic abnormality", 0.0),
    (707, "Abnormality of the nervous system", 1.0),
    (12639, "Abnormal nervous system morphology", 1.5),
    (2011, "Morphological central nervous system abnormality", 2.0),
    (12443, "Abnormality of brain morphology", 2.5),
    (100547, "Abnormal forebrain morphology", 3.0),
    (12638, "Abnormal nervous system physiology", 1.5),
    (818, "Abnormality of the endocrine system", 1.2),
    (864, "Abnormality of the hypothalamus-pituitary axis", 2.2),
    (12285, "Abnormal hypothalamus physiology", 3.5),
    (2715, "Abnormality of the immune system", 1.1),
    (10978, "Abnormality of immune system physiology", 1.8),
];

const CONNECTIONS: [(u32, u32); 13] = [
    (1, 118),
    (118, 707),
    (707, 12639),
    (12639, 2011),
    (2011, 12443),
    (12443, 100547),
    (707, 12638),
    (118, 818),
    (818, 864),
    (864, 12285),
    (12638, 12285),
    (118, 2715),
    (2715, 10978),
];

pub(crate) fn example_ontology() -> Ontology {
    let mut ontology = Ontology::default();
    for (id, name, _) in TERMS {
        ontology.insert_term(name.to_string(), id);
    }
    for (parent, child) in CONNECTIONS {
        ontology
            .add_parent(parent, child)
            .expect("all terms are inserted");
    }
    ontology.create_cache();
    for (id, _, ic) in TERMS {
        ontology
            .set_information_content(id, ic)
            .expect("all terms are inserted");
    }
    ontology
}

/// - `OMIM:100001` forebrain and hypothalamus, caused by gene `1`
/// - `OMIM:100002` immune system, caused by gene `2`
/// - `OMIM:100003` without any annotation
pub(crate) fn example_diseases() -> DiseaseAnnotations {
    let mut forebrain = Disease::new(DiseaseId::omim(100001), "Forebrain disease");
    forebrain
        .add_term(100547u32, Some(0.8))
        .expect("valid frequency");
    forebrain.add_term(12285u32, None).expect("valid frequency");
    forebrain.add_gene(GeneId::from(1u32));

    let mut immune = Disease::new(DiseaseId::omim(100002), "Immune disease");
    immune.add_term(10978u32, None).expect("valid frequency");
    immune.add_gene(GeneId::from(2u32));

    let unannotated = Disease::new(DiseaseId::omim(100003), "Unannotated disease");

    [forebrain, immune, unannotated].into_iter().collect()
}

/// Two heterozygous pathogenic variants in gene `1`, one benign variant in gene `2`
pub(crate) fn example_evidence() -> GenotypeEvidence {
    let mut background = BackgroundFrequencies::new();
    background.insert(GeneId::from(1u32), PathogenicityBin::Pathogenic, 0.01);
    background.insert(GeneId::from(2u32), PathogenicityBin::Pathogenic, 0.02);

    let mut evidence = GenotypeEvidence::new(background);

    let gene = GeneId::from(1u32);
    let mut bundle = GeneVariantBundle::new(gene, "GENE1");
    for pathogenicity in [0.9, 0.95] {
        let variant = Variant::new(gene, pathogenicity, 0.0001, 1).expect("valid variant");
        bundle.add_variant(variant).expect("same gene");
    }
    evidence.add_bundle(bundle);

    let benign = Variant::new(GeneId::from(2u32), 0.1, 0.01, 1).expect("valid variant");
    evidence.add_variant("GENE2", benign);
    evidence
}
