/// Modality normalization.
///
/// The upstream `modality` column is heterogeneous: a single tag, a
/// "/"-separated string, a list, or null, with Cyrillic and Latin spellings
/// mixed freely. This module canonicalizes any of those into a set of
/// canonical tags (CT, MRI, XRAY, US, OTHER, ...). Unknown tokens pass
/// through after trim/uppercase so new modalities do not silently vanish.
use crate::domain::{ModalityField, ModalitySet};

fn alias(token: &str) -> &str {
    match token {
        "KT" | "КТ" => "CT",
        "MRT" | "МРТ" => "MRI",
        "RENTGEN" | "РЕНТГЕН" | "X_RAY" => "XRAY",
        "УЗИ" | "ULTRASOUND" => "US",
        "ПРОЧЕЕ" => "OTHER",
        other => other,
    }
}

/// Canonicalize a raw modality descriptor. Pure; never fails.
pub fn normalize(field: &ModalityField) -> ModalitySet {
    let mut set = ModalitySet::new();
    match field {
        ModalityField::Empty => {}
        ModalityField::Single(s) => {
            for token in s.split('/') {
                insert_token(&mut set, token);
            }
        }
        ModalityField::Many(items) => {
            for item in items {
                for token in item.split('/') {
                    insert_token(&mut set, token);
                }
            }
        }
    }
    set
}

fn insert_token(set: &mut ModalitySet, token: &str) {
    let token = token.trim().to_uppercase();
    if token.is_empty() {
        return;
    }
    set.insert(alias(&token).to_string());
}
