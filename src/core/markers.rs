use crate::domain::model::{GenotypeTable, MarkerDefinition};

pub const SLC23A1: &str = "SLC23A1_rs33972313";
pub const SLC23A2: &str = "SLC23A2_rs12479919";
pub const GSTT1: &str = "GSTT1_null_variant";
pub const GSTM1: &str = "GSTM1_null_variant";
pub const GPX1: &str = "GPX1_rs1050450";

fn marker(id: &str, beta: f64, description: &str, genotypes: GenotypeTable) -> MarkerDefinition {
    MarkerDefinition {
        id: id.to_string(),
        beta,
        description: description.to_string(),
        is_risk: true,
        genotypes,
    }
}

fn null_variant_table() -> GenotypeTable {
    GenotypeTable::new([("del/del", 2), ("ins/del", 1), ("ins/ins", 0)])
}

/// The five-marker vitamin C response panel, in display order.
pub fn reference_panel() -> Vec<MarkerDefinition> {
    vec![
        marker(
            SLC23A1,
            -0.4,
            "↓ vitamin C transport",
            GenotypeTable::new([("TT", 2), ("TG", 1), ("GG", 0)]),
        ),
        marker(
            SLC23A2,
            -0.3,
            "↓ intestinal absorption",
            // AA carries no risk allele in this table
            GenotypeTable::new([("GG", 0), ("AG", 1), ("AA", 0)]),
        ),
        marker(GSTT1, -0.5, "↓ antioxidant defense", null_variant_table()),
        marker(
            GSTM1,
            -0.3,
            "↓ free radical detoxification",
            null_variant_table(),
        ),
        marker(
            GPX1,
            -0.2,
            "↓ glutathione peroxidase efficiency",
            GenotypeTable::new([("TT", 2), ("CT", 1), ("CC", 0)]),
        ),
    ]
}
