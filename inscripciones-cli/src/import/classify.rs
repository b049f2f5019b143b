//! Modality facet classification

use crate::api::NewModalidad;

/// Delivery facets derived from a modality name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalityFacets {
    pub sincronico: bool,
    pub asincronico: bool,
}

/// Decides the facets of a modality created during import
pub trait ModalityClassifier: Send + Sync {
    fn classify(&self, name: &str) -> ModalityFacets;

    /// Draft for a modality missing from the catalog
    fn draft(&self, name: &str) -> NewModalidad {
        let facets = self.classify(name);
        NewModalidad {
            nombre: name.to_string(),
            sincronico: facets.sincronico,
            asincronico: facets.asincronico,
        }
    }
}

/// Keyword match on the lowercased name
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringClassifier;

impl ModalityClassifier for SubstringClassifier {
    fn classify(&self, name: &str) -> ModalityFacets {
        let name = name.to_lowercase();
        let asincr = name.contains("asincr");

        ModalityFacets {
            // "asincrónico" contains "sincrón", so any "asincr" rules it out
            sincronico: (name.contains("sincrón") || name.contains("sincr")) && !asincr,
            asincronico: asincr
                || name.contains("e-learning")
                || name.contains("elearning"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facets(name: &str) -> (bool, bool) {
        let f = SubstringClassifier.classify(name);
        (f.sincronico, f.asincronico)
    }

    #[test]
    fn test_asynchronous_names() {
        assert_eq!(facets("Asincrónico"), (false, true));
        assert_eq!(facets("asincronico"), (false, true));
        assert_eq!(facets("e-learning"), (false, true));
        assert_eq!(facets("E-Learning Autoinstruccional"), (false, true));
        assert_eq!(facets("eLearning"), (false, true));
    }

    #[test]
    fn test_synchronous_names() {
        assert_eq!(facets("Sincrónico"), (true, false));
        assert_eq!(facets("SINCRONICO"), (true, false));
        assert_eq!(facets("Sincrónico online"), (true, false));
    }

    #[test]
    fn test_mixed_and_unknown_names() {
        assert_eq!(facets("Sincrónico y Asincrónico"), (false, true));
        assert_eq!(facets("Presencial"), (false, false));
    }

    #[test]
    fn test_draft_carries_facets() {
        let draft = SubstringClassifier.draft("Asincrónico");
        assert_eq!(draft.nombre, "Asincrónico");
        assert!(draft.asincronico);
        assert!(!draft.sincronico);
    }
}
