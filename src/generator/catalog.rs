#[cfg(feature = "debug-traces")]
use tracing::{debug, warn};

use crate::CatalogError;

use super::template::{Template, TemplateIndex, ALL_TEMPLATE_ROTATIONS};

/// Used to create a [`TemplateCatalog`] from hand-authored base templates.
///
/// ### Example
/// ```
/// use tilemap_wfc::generator::{catalog::CatalogBuilder, template::{BorderKind, Template}};
///
/// let catalog = CatalogBuilder::new()
///     .with_template(Template::uniform(0, BorderKind::VOID))
///     .with_template(Template::new(1, BorderKind::BORDER, BorderKind::BORDER, BorderKind::VOID, BorderKind::VOID))
///     .build()
///     .unwrap();
/// // The uniform template is only kept once, the corner is kept in its 4 rotations
/// assert_eq!(catalog.templates_count(), 5);
/// ```
#[derive(Clone, Default)]
pub struct CatalogBuilder {
    base_templates: Vec<Template>,
}

impl CatalogBuilder {
    /// Creates an empty [`CatalogBuilder`]
    pub fn new() -> Self {
        Self {
            base_templates: Vec::new(),
        }
    }

    /// Creates a [`CatalogBuilder`] from a list of base templates
    pub fn from_base_templates(base_templates: Vec<Template>) -> Self {
        Self { base_templates }
    }

    /// Adds a base template. Its 4 rotations will be added to the catalog.
    pub fn with_template(mut self, template: Template) -> Self {
        self.base_templates.push(template);
        self
    }

    /// Expands the base templates in all their rotations and removes duplicates.
    ///
    /// Returns [`CatalogError::NoTemplates`] if no base template was given.
    pub fn build(self) -> Result<TemplateCatalog, CatalogError> {
        if self.base_templates.is_empty() {
            return Err(CatalogError::NoTemplates);
        }
        Ok(TemplateCatalog::from_expanded(expand_templates(
            &self.base_templates,
        )))
    }
}

/// Rotates every base template in `0..=3` quarter turns and inserts the results in order, skipping any template whose edges and id are already present.
pub(crate) fn expand_templates(base_templates: &[Template]) -> Vec<Template> {
    let mut expanded: Vec<Template> = Vec::with_capacity(base_templates.len() * 4);
    for base in base_templates {
        let mut base = *base;
        if base.weight == 0 {
            #[cfg(feature = "debug-traces")]
            warn!(
                "Template with id {} had an invalid weight of 0, weight overriden to 1",
                base.id
            );
            base.weight = 1;
        }
        for &rotation in ALL_TEMPLATE_ROTATIONS {
            let rotated = base.rotated(rotation);
            if expanded.iter().any(|t| t.same_signature(&rotated)) {
                continue;
            }
            expanded.push(rotated);
        }
    }

    #[cfg(feature = "debug-traces")]
    debug!(
        "Expanded {} base templates into {} templates",
        base_templates.len(),
        expanded.len()
    );

    expanded
}

/// Immutable list of every usable [`Template`], rotations included.
///
/// Shared read-only between the cells of a [`crate::generator::Grid`], and between grids through an `Arc`.
#[derive(Clone, Debug)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    pub(crate) fn from_expanded(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// Returns how many templates are in the catalog
    #[inline]
    pub fn templates_count(&self) -> usize {
        self.templates.len()
    }

    /// Returns the template at `index` if it exists
    #[inline]
    pub fn template(&self, index: TemplateIndex) -> Option<&Template> {
        self.templates.get(index)
    }

    /// NO CHECK is done to verify that `index` is a valid index for this catalog.
    #[inline]
    pub(crate) fn template_unchecked(&self, index: TemplateIndex) -> &Template {
        &self.templates[index]
    }

    /// Returns all the templates, in catalog order
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        generator::{
            presets::{unweighted_base_templates, weighted_base_templates},
            template::{rotate, BorderKind, Template, TemplateRotation},
        },
        CatalogError,
    };

    use super::CatalogBuilder;

    #[test]
    fn build_is_deterministic() {
        let first = CatalogBuilder::from_base_templates(weighted_base_templates())
            .build()
            .unwrap();
        let second = CatalogBuilder::from_base_templates(weighted_base_templates())
            .build()
            .unwrap();
        assert_eq!(first.templates(), second.templates());
    }

    #[test]
    fn no_duplicated_signature() {
        for base in [weighted_base_templates(), unweighted_base_templates()] {
            let catalog = CatalogBuilder::from_base_templates(base).build().unwrap();
            let templates = catalog.templates();
            for (i, a) in templates.iter().enumerate() {
                for b in &templates[i + 1..] {
                    assert!(!a.same_signature(b), "{} and {} are duplicates", a, b);
                }
            }
        }
    }

    #[test]
    fn symmetric_templates_are_pruned() {
        let catalog = CatalogBuilder::new()
            .with_template(Template::uniform(0, BorderKind::VOID))
            .with_template(Template::new(
                3,
                BorderKind::VOID,
                BorderKind::BORDER,
                BorderKind::VOID,
                BorderKind::BORDER,
            ))
            .build()
            .unwrap();
        // 1 rotation for the uniform template, 2 for the straight line
        assert_eq!(catalog.templates_count(), 3);
        assert_eq!(catalog.templates()[0].rotation, TemplateRotation::Rot0);
        // First built rotation wins
        assert_eq!(catalog.templates()[1].rotation, TemplateRotation::Rot0);
        assert_eq!(catalog.templates()[2].rotation, TemplateRotation::Rot90);
    }

    #[test]
    fn same_edges_different_ids_are_kept() {
        let catalog = CatalogBuilder::new()
            .with_template(Template::uniform(0, BorderKind::GREEN))
            .with_template(Template::uniform(1, BorderKind::GREEN))
            .build()
            .unwrap();
        assert_eq!(catalog.templates_count(), 2);
    }

    #[test]
    fn catalog_is_closed_under_rotation() {
        let catalog = CatalogBuilder::from_base_templates(weighted_base_templates())
            .build()
            .unwrap();
        for template in catalog.templates() {
            let mut rotated = *template;
            for _ in 0..4 {
                rotated = rotate(&rotated, 1).unwrap();
            }
            assert_eq!(rotated.edges(), template.edges());
            // Any quarter turn of a catalog template is also in the catalog
            let turned = rotate(template, 1).unwrap();
            assert!(catalog.templates().iter().any(|t| t.same_signature(&turned)));
        }
    }

    #[test]
    fn zero_weight_is_overriden() {
        let catalog = CatalogBuilder::new()
            .with_template(Template::uniform(0, BorderKind::VOID).with_weight(0))
            .build()
            .unwrap();
        assert_eq!(catalog.templates()[0].weight, 1);
    }

    #[test]
    fn empty_catalog_fails() {
        assert_eq!(
            CatalogBuilder::new().build().unwrap_err(),
            CatalogError::NoTemplates
        );
    }

    #[test]
    fn first_template_is_the_void_boundary() {
        let catalog = CatalogBuilder::from_base_templates(weighted_base_templates())
            .build()
            .unwrap();
        assert_eq!(
            catalog.template(0).unwrap().edges(),
            [BorderKind::VOID; 4]
        );
        assert!(catalog.template(catalog.templates_count()).is_none());
    }
}
