pub mod categories;
pub mod products;
pub mod reviews;

pub use categories::Entity as Categories;
pub use products::Entity as Products;
pub use reviews::Entity as Reviews;
