//! Rule module: knowledge base model, loading, and the detection result type
pub mod model;
pub mod loader;

pub use self::model::{CategoryRule, DetectionResult, KnowledgeBase, Signature};
pub use self::loader::{EMBEDDED_KNOWLEDGE_BASE, KnowledgeBaseLoader};
