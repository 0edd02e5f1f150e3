pub mod configuration;
pub mod configuration_category;
pub mod configuration_material;
pub mod material;
pub mod order;
pub mod order_item;

pub use configuration::Entity as Configuration;
pub use configuration_category::Entity as ConfigurationCategory;
pub use configuration_material::Entity as ConfigurationMaterial;
pub use material::Entity as Material;
pub use order::Entity as Order;
pub use order_item::Entity as OrderItem;
