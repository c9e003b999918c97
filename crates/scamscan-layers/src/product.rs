//! Product layer: barcode checksum and manufacturer verification.
//!
//! Only runs for `DetectedType::Product` payloads. Counterfeit labels
//! usually fail the GS1 check digit or carry a prefix the registry has
//! never issued.

use std::sync::Arc;

use async_trait::async_trait;
use scamscan_core::{Layer, LayerContext, LayerError, LayerKind, LayerResult};
use scamscan_intel::{ManufacturerRegistry, PrefixRisk, ProductRegistry};
use serde_json::json;

/// GS1 mod-10 check: weights alternate 3,1 from the rightmost digit
/// before the check digit. Covers UPC-A and EAN-13.
pub fn check_digit_valid(code: &str) -> bool {
    let digits: Vec<u32> = code.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != code.len() || digits.len() < 2 {
        return false;
    }
    let Some((check, rest)) = digits.split_last() else {
        return false;
    };
    let sum: u32 = rest
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    *check == (10 - sum % 10) % 10
}

pub struct ProductLayer {
    manufacturers: Arc<dyn ManufacturerRegistry>,
    products: Arc<dyn ProductRegistry>,
}

impl ProductLayer {
    pub fn new(
        manufacturers: Arc<dyn ManufacturerRegistry>,
        products: Arc<dyn ProductRegistry>,
    ) -> Self {
        Self {
            manufacturers,
            products,
        }
    }
}

#[async_trait]
impl Layer for ProductLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Product
    }

    async fn analyze(&self, payload: &str, _ctx: &LayerContext) -> Result<LayerResult, LayerError> {
        let mut result = LayerResult::new();

        if !check_digit_valid(payload) {
            result.add(60, "Invalid Barcode Checksum");
            result.detail("checksumValid", json!(false));
            return Ok(result);
        }
        result.detail("checksumValid", json!(true));

        let prefix = payload.get(..3).unwrap_or(payload);
        match self.manufacturers.lookup_prefix(prefix).await? {
            None => result.add(20, "Unverified manufacturer prefix"),
            Some(record) => {
                result.detail("manufacturerCountry", json!(record.country));
                if record.risk == PrefixRisk::High {
                    result.add(30, "High-risk manufacturer prefix");
                }
            }
        }

        match self.products.lookup(payload).await? {
            None => {}
            Some(product) => {
                result.detail("productName", json!(product.name));
                if !product.verified {
                    result.add(20, "Product listed but not verified");
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scamscan_intel::{
        ManufacturerRecord, MemoryManufacturerRegistry, MemoryProductRegistry, ProductRecord,
    };

    fn layer() -> (ProductLayer, Arc<MemoryManufacturerRegistry>, Arc<MemoryProductRegistry>) {
        let manufacturers = Arc::new(MemoryManufacturerRegistry::new());
        let products = Arc::new(MemoryProductRegistry::new());
        (
            ProductLayer::new(manufacturers.clone(), products.clone()),
            manufacturers,
            products,
        )
    }

    #[test]
    fn test_check_digit_known_codes() {
        // Valid EAN-13 and UPC-A.
        assert!(check_digit_valid("4006381333931"));
        assert!(check_digit_valid("036000291452"));
        // Last digit off by one.
        assert!(!check_digit_valid("4006381333932"));
        assert!(!check_digit_valid("not-a-barcode"));
    }

    #[tokio::test]
    async fn test_bad_checksum_short_circuits() {
        let (layer, _, _) = layer();
        let result = layer
            .analyze("4006381333932", &LayerContext::default())
            .await
            .unwrap();
        assert_eq!(result.risk_score, 60);
        assert!(result
            .findings
            .contains(&"Invalid Barcode Checksum".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_prefix() {
        let (layer, _, _) = layer();
        let result = layer
            .analyze("4006381333931", &LayerContext::default())
            .await
            .unwrap();
        assert_eq!(result.risk_score, 20);
    }

    #[tokio::test]
    async fn test_high_risk_prefix_and_unverified_product() {
        let (layer, manufacturers, products) = layer();
        manufacturers
            .upsert(ManufacturerRecord {
                prefix: "400".into(),
                country: "Germany".into(),
                risk: PrefixRisk::High,
            })
            .await;
        products
            .upsert(ProductRecord {
                barcode: "4006381333931".into(),
                name: "Stabilo Pen".into(),
                brand: "Stabilo".into(),
                verified: false,
            })
            .await;
        let result = layer
            .analyze("4006381333931", &LayerContext::default())
            .await
            .unwrap();
        assert_eq!(result.risk_score, 50);
        assert_eq!(
            result.details.get("manufacturerCountry").and_then(|v| v.as_str()),
            Some("Germany")
        );
    }

    #[tokio::test]
    async fn test_known_safe_product() {
        let (layer, manufacturers, products) = layer();
        manufacturers
            .upsert(ManufacturerRecord {
                prefix: "400".into(),
                country: "Germany".into(),
                risk: PrefixRisk::Safe,
            })
            .await;
        products
            .upsert(ProductRecord {
                barcode: "4006381333931".into(),
                name: "Stabilo Pen".into(),
                brand: "Stabilo".into(),
                verified: true,
            })
            .await;
        let result = layer
            .analyze("4006381333931", &LayerContext::default())
            .await
            .unwrap();
        assert_eq!(result.risk_score, 0);
    }
}
