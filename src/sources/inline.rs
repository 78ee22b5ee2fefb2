use super::CollectText;
use crate::core::DiscoverySet;

/// Strings listed directly in the configuration.
#[derive(Debug, Clone)]
pub struct InlineSource {
    texts: Vec<String>,
}

impl InlineSource {
    pub fn new(texts: Vec<String>) -> Self {
        Self { texts }
    }
}

impl CollectText for InlineSource {
    fn name(&self) -> &str {
        "inline"
    }

    fn collect(&self) -> anyhow::Result<DiscoverySet> {
        Ok(self
            .texts
            .iter()
            .filter(|text| !text.trim().is_empty())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_texts_are_skipped() {
        let source = InlineSource::new(vec!["OK".into(), "".into(), "  ".into()]);
        let found = source.collect().unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains("ok"));
    }
}
