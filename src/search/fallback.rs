use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{PartDraft, PartRecord, Supplier, SAMPLE_NOTE};

pub const FALLBACK_ID: &str = "fallback";

const PART_NUMBER_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

struct SamplePart {
    part_number: &'static str,
    name: &'static str,
    price: f64,
    supplier: Supplier,
}

struct Category {
    keywords: &'static [&'static str],
    parts: &'static [SamplePart],
}

const CATEGORIES: &[Category] = &[
    Category {
        keywords: &["bearing", "6203"],
        parts: &[
            SamplePart {
                part_number: "6203-2Z",
                name: "SKF Deep Groove Ball Bearing - 6203-2Z",
                price: 12.45,
                supplier: Supplier::Grainger,
            },
            SamplePart {
                part_number: "6203-RS",
                name: "Timken Single Row Ball Bearing",
                price: 11.80,
                supplier: Supplier::McMasterCarr,
            },
        ],
    },
    Category {
        keywords: &["seal", "hydraulic"],
        parts: &[
            SamplePart {
                part_number: "CR-25x35x7",
                name: "Hydraulic Oil Seal 25x35x7mm",
                price: 15.60,
                supplier: Supplier::Grainger,
            },
            SamplePart {
                part_number: "VS-40x52x7",
                name: "Valve Stem Seal 40x52x7mm",
                price: 18.25,
                supplier: Supplier::Fastenal,
            },
        ],
    },
    Category {
        keywords: &["bolt", "screw", "fastener"],
        parts: &[
            SamplePart {
                part_number: "M8x25-HEX",
                name: "Hex Head Cap Screw M8 x 25mm, Stainless Steel",
                price: 2.45,
                supplier: Supplier::Fastenal,
            },
            SamplePart {
                part_number: "1/4-20x1",
                name: "Socket Head Cap Screw 1/4-20 x 1\", Alloy Steel",
                price: 1.95,
                supplier: Supplier::McMasterCarr,
            },
        ],
    },
];

/// Placeholder records for when no catalog produced anything. Always
/// returns at least one record, each carrying [`SAMPLE_NOTE`].
pub fn generate<R: Rng + ?Sized>(query: &str, rng: &mut R) -> Vec<PartRecord> {
    let lowered = query.to_lowercase();

    let category = CATEGORIES
        .iter()
        .find(|category| category.keywords.iter().any(|k| lowered.contains(k)));

    match category {
        Some(category) => category.parts.iter().map(sample_record).collect(),
        None => vec![generic_record(query, rng)],
    }
}

fn sample_record(part: &SamplePart) -> PartRecord {
    let mut draft = PartDraft::new(part.supplier, FALLBACK_ID);
    draft.part_number = part.part_number.to_string();
    draft.name = part.name.to_string();
    draft.price = Some(part.price);
    draft.price_text = format!("${:.2}", part.price);
    draft.availability = "In Stock".to_string();
    draft.product_url = Some(part.supplier.default_origin().to_string());
    draft.into_synthetic(SAMPLE_NOTE)
}

fn generic_record<R: Rng + ?Sized>(query: &str, rng: &mut R) -> PartRecord {
    let suffix: String = (0..6)
        .map(|_| char::from(PART_NUMBER_CHARSET[rng.gen_range(0..PART_NUMBER_CHARSET.len())]))
        .collect();
    let cents: u32 = rng.gen_range(1000..6000);
    let price = f64::from(cents) / 100.0;
    let supplier = *[Supplier::Grainger, Supplier::McMasterCarr]
        .choose(rng)
        .unwrap_or(&Supplier::Grainger);
    let availability = if rng.gen_bool(0.8) {
        "In Stock"
    } else {
        "2-3 Day Lead Time"
    };

    let mut draft = PartDraft::new(supplier, FALLBACK_ID);
    draft.part_number = format!("IND-{suffix}");
    draft.name = format!("Industrial Component for \"{}\"", query.trim());
    draft.price = Some(price);
    draft.price_text = format!("${price:.2}");
    draft.availability = availability.to_string();
    draft.product_url = Some(supplier.default_origin().to_string());
    draft.into_synthetic(SAMPLE_NOTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn bearing_queries_get_bearing_samples() {
        let mut rng = StdRng::seed_from_u64(1);
        let records = generate("6203 bearing", &mut rng);
        let numbers: Vec<&str> = records.iter().map(|r| r.part_number()).collect();
        assert_eq!(numbers, vec!["6203-2Z", "6203-RS"]);
        assert_eq!(records[1].supplier(), Supplier::McMasterCarr);
        assert!(records.iter().all(|r| r.note() == Some(SAMPLE_NOTE)));
    }

    #[test]
    fn classification_ignores_case() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(generate("HYDRAULIC pump", &mut rng)[0].part_number(), "CR-25x35x7");
        assert_eq!(generate("Socket Screw", &mut rng)[0].part_number(), "M8x25-HEX");
    }

    #[test]
    fn unknown_queries_get_one_generic_record() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = generate("widget", &mut rng);
        assert_eq!(records.len(), 1);

        let record = &records[0];
        let suffix = record.part_number().strip_prefix("IND-").unwrap();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert_eq!(record.name(), "Industrial Component for \"widget\"");
        assert!(matches!(record.supplier(), Supplier::Grainger | Supplier::McMasterCarr));

        let price = record.price().unwrap();
        assert!((10.0..60.0).contains(&price));
        assert_eq!((price * 100.0).round() / 100.0, price);
        assert!(["In Stock", "2-3 Day Lead Time"].contains(&record.availability()));
        assert!(record.is_synthetic());
    }

    #[test]
    fn same_seed_same_record() {
        let a = generate("widget", &mut StdRng::seed_from_u64(42));
        let b = generate("widget", &mut StdRng::seed_from_u64(42));
        assert_eq!(a[0].part_number(), b[0].part_number());
        assert_eq!(a[0].price(), b[0].price());
    }
}
