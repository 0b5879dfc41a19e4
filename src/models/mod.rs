mod product;

pub use product::ProductRecord;
