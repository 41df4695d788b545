mod chunker;
mod embedder;
mod embedding;
mod extractor;
mod vector_store;

pub use chunker::TextChunker;
pub use embedder::{EmbedPipeline, discover_text_files, read_text_file};
pub use embedding::{Embedder, OpenAiEmbeddingClient};
pub use extractor::{PdfDecoder, PdfExtractDecoder, PdfExtractor, discover_pdfs};
pub use vector_store::{PineconeBackend, QdrantBackend, VectorStore, create_backend};
