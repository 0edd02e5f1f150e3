use std::str::FromStr;

use strum::{Display, EnumString};

use crate::errors::ServiceError;

pub mod configurations;
pub mod materials;
pub mod orders;
pub mod stats;

/// The two product families the shop builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ProductType {
    HotTub,
    Sauna,
}

/// Parses a wire-format product type ("hot_tub" | "sauna").
pub fn parse_product_type(raw: &str) -> Result<ProductType, ServiceError> {
    ProductType::from_str(raw).map_err(|_| {
        ServiceError::ValidationError(format!("Unknown product type: {raw}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_type_round_trips_wire_names() {
        assert_eq!(parse_product_type("hot_tub").unwrap(), ProductType::HotTub);
        assert_eq!(parse_product_type("sauna").unwrap(), ProductType::Sauna);
        assert_eq!(ProductType::HotTub.to_string(), "hot_tub");
    }

    #[test]
    fn product_type_rejects_unknown_values() {
        assert!(matches!(
            parse_product_type("gazebo"),
            Err(ServiceError::ValidationError(_))
        ));
    }
}
