use std::sync::{Arc, OnceLock};

use super::{
    catalog::{expand_templates, TemplateCatalog},
    template::{BorderKind, Template},
};

const VOID: BorderKind = BorderKind::VOID;
const BORDER: BorderKind = BorderKind::BORDER;
const GREEN: BorderKind = BorderKind::GREEN;

static DEFAULT_CATALOG: OnceLock<Arc<TemplateCatalog>> = OnceLock::new();

/// Returns the catalog built from [`weighted_base_templates`].
///
/// It is built on first use and then shared by every caller.
pub fn default_catalog() -> Arc<TemplateCatalog> {
    Arc::clone(DEFAULT_CATALOG.get_or_init(|| {
        Arc::new(TemplateCatalog::from_expanded(expand_templates(
            &weighted_base_templates(),
        )))
    }))
}

/// Walls, paths and vegetation with tuned weights. The first template is the all-void one used on the grid boundary.
pub fn weighted_base_templates() -> Vec<Template> {
    vec![
        // empty
        Template::new(0, VOID, VOID, VOID, VOID).with_weight(4),
        // wall corner
        Template::new(1, BORDER, BORDER, VOID, VOID).with_weight(4),
        // wall cross
        Template::new(2, BORDER, BORDER, BORDER, BORDER).with_weight(8),
        // wall line
        Template::new(3, VOID, BORDER, VOID, BORDER).with_weight(4),
        // wall T
        Template::new(4, VOID, BORDER, BORDER, BORDER).with_weight(1),
        // path crossing a wall
        Template::new(5, GREEN, BORDER, GREEN, BORDER).with_weight(16),
        // path
        Template::new(6, GREEN, VOID, GREEN, VOID).with_weight(1),
        // path turn
        Template::new(8, VOID, GREEN, GREEN, VOID).with_weight(1),
        // path crossing a wall, variant
        Template::new(13, GREEN, BORDER, GREEN, BORDER).with_weight(16),
        // path end
        Template::new(7, VOID, VOID, GREEN, VOID).with_weight(1),
        // path T
        Template::new(14, GREEN, GREEN, GREEN, VOID).with_weight(4),
        // path cross
        Template::new(15, GREEN, GREEN, GREEN, GREEN).with_weight(1),
        // wall ending on a path
        Template::new(9, VOID, BORDER, GREEN, BORDER).with_weight(1),
    ]
}

/// Same family of tiles with every weight set to 1. The first template is the all-void one.
pub fn unweighted_base_templates() -> Vec<Template> {
    vec![
        Template::new(0, VOID, VOID, VOID, VOID),
        Template::new(1, BORDER, BORDER, VOID, VOID),
        Template::new(2, BORDER, BORDER, BORDER, BORDER),
        Template::new(3, VOID, BORDER, VOID, BORDER),
        Template::new(4, VOID, BORDER, BORDER, BORDER),
        Template::new(5, GREEN, BORDER, GREEN, BORDER),
        Template::new(6, GREEN, VOID, GREEN, VOID),
        Template::new(7, VOID, VOID, GREEN, VOID),
        Template::new(8, VOID, GREEN, GREEN, VOID),
        Template::new(9, VOID, BORDER, GREEN, BORDER),
        Template::new(10, GREEN, BORDER, BORDER, BORDER),
        Template::new(11, VOID, VOID, VOID, BORDER),
        Template::new(12, GREEN, GREEN, GREEN, BORDER),
        Template::new(13, GREEN, BORDER, GREEN, BORDER),
    ]
}
