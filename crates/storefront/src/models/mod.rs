//! Domain models and API view types.

pub mod cart;
pub mod knowledge;
pub mod order;
pub mod product;

pub use cart::{Cart, CartItemView, CartView};
pub use knowledge::{ArticleHit, KnowledgeArticle};
pub use order::OrderReceipt;
pub use product::{CategorySummary, ProductDetail, ProductHit, ReviewView};
