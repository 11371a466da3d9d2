use quote_store::Quote;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub character: String,
}

/// A quote as stored in the index: sentence as text, speaker as metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Wraps a quote with a fresh document id.
    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: quote.sentence.clone(),
            metadata: DocumentMetadata {
                character: quote.character.clone(),
            },
        }
    }

    pub fn to_quote(&self) -> Quote {
        Quote::new(self.text.clone(), self.metadata.character.clone())
    }

    /// True when this document still represents `quote` exactly.
    pub fn matches(&self, quote: &Quote) -> bool {
        self.text == quote.sentence && self.metadata.character == quote.character
    }
}

/// A document together with its embedding. Never mutated once created.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDocument {
    pub document: Document,
    pub embedding: Vec<f32>,
}

pub fn quotes_to_documents(quotes: &[Quote]) -> Vec<Document> {
    quotes.iter().map(Document::from_quote).collect()
}
