//! Last-resort knot strategies that only capture physical attributes.

use super::types::StrategyHit;
use crate::catalog::{detect_fiber, parse_knot_size, ProductIdentity};

pub(super) fn fiber(text: &str) -> Option<StrategyHit> {
    let fiber = detect_fiber(text)?;
    Some(StrategyHit {
        identity: ProductIdentity {
            fiber: Some(fiber),
            knot_size_mm: parse_knot_size(text),
            ..ProductIdentity::default()
        },
        pattern: None,
    })
}

pub(super) fn knot_size(text: &str) -> Option<StrategyHit> {
    let size = parse_knot_size(text)?;
    Some(StrategyHit {
        identity: ProductIdentity {
            knot_size_mm: Some(size),
            ..ProductIdentity::default()
        },
        pattern: None,
    })
}
