use anyhow::Result;
use reqwest::Client;

use super::{CatalogStrategy, StaticFetcher};
use crate::config::Config;
use crate::extract::LocatorSpec;
use crate::models::Supplier;

pub const ID: &str = "mcmaster";

pub const LOCATORS: LocatorSpec = LocatorSpec {
    containers: &[".ProductTableRow", ".product-item", ".search-result"],
    part_number: &[".PartNumber", ".part-number"],
    name: &[".ProductDescription", ".product-description"],
    price: &[".Price", ".price"],
    availability: &[".Availability", ".availability"],
    min_part_number_chars: 1,
    min_name_chars: 1,
};

pub fn strategy(config: &Config, client: Client) -> Result<CatalogStrategy> {
    let site = config.supplier(Supplier::McMasterCarr)?;
    let fetcher = StaticFetcher::for_supplier(config, site, client);
    CatalogStrategy::new(ID, Supplier::McMasterCarr, config, &LOCATORS, Box::new(fetcher))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_product_table_rows() {
        let html = r#"<table>
          <tr class="ProductTableRow">
            <td class="PartNumber">5972K91</td>
            <td class="ProductDescription">Ball Bearing, Sealed, Trade No. 6203-2RS</td>
            <td class="Price">$11.80 each</td>
          </tr>
          <tr class="ProductTableRow"><td class="PartNumber"></td></tr>
        </table>"#;

        let strategy = strategy(&Config::default(), Client::new()).unwrap();
        let records = strategy.parser().parse(html, 5);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].part_number(), "5972K91");
        assert_eq!(records[0].price(), Some(11.8));
        assert_eq!(records[0].supplier(), Supplier::McMasterCarr);
        assert_eq!(records[0].availability(), "Available");
        assert!(records[0].in_stock());
    }
}
