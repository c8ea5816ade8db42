use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    catalog::{Catalog, ColumnDef, DataType, ForeignKey, Schema, Table},
    error::LoaderError,
};

pub const CUSTOMERS_CSV: &str = "bakery/customers.csv";
pub const GOODS_CSV: &str = "bakery/goods.csv";
pub const RECEIPTS_CSV: &str = "bakery/receipts.csv";
pub const ITEMS_CSV: &str = "bakery/items.csv";

/// `28-Oct-2007` -> `20071028`. The month abbreviation is matched
/// case-insensitively and a single digit day is accepted.
pub fn reformat_date(raw: &str) -> Result<String, LoaderError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%d-%b-%Y")
        .map_err(|e| LoaderError::InvalidDate(format!("{:?}: {}", raw, e)))?;
    Ok(date.format("%Y%m%d").to_string())
}

/// customers, goods, receipts, items in creation order.
pub fn catalog() -> Result<Catalog, LoaderError> {
    let mut catalog = Catalog::new();

    let customers = Schema::new(
        vec![
            ColumnDef::new("CId", DataType::Int, false),
            ColumnDef::new("LastName", DataType::Varchar(30), true),
            ColumnDef::new("FirstName", DataType::Varchar(30), true),
        ],
        vec![0],
    );
    catalog.add_table(Arc::new(Table::new("customers", Arc::new(customers))))?;

    let goods = Schema::new(
        vec![
            ColumnDef::new("GId", DataType::Varchar(15), false),
            ColumnDef::new("Flavor", DataType::Varchar(20), true),
            ColumnDef::new("Food", DataType::Varchar(20), true),
            ColumnDef::new(
                "Price",
                DataType::Decimal {
                    precision: 5,
                    scale: 2,
                },
                true,
            ),
        ],
        vec![0],
    );
    catalog.add_table(Arc::new(Table::new("goods", Arc::new(goods))))?;

    let receipts = Schema::new(
        vec![
            ColumnDef::new("RNumber", DataType::Int, false),
            ColumnDef::new("SaleDate", DataType::Date, true),
            ColumnDef::new("Customer", DataType::Int, true),
        ],
        vec![0],
    )
    .with_foreign_key(ForeignKey::new("Customer", "customers", "CId"));
    catalog.add_table(Arc::new(Table::new("receipts", Arc::new(receipts))))?;

    let items = Schema::new(
        vec![
            ColumnDef::new("Receipt", DataType::Int, false),
            ColumnDef::new("Ordinal", DataType::Int, false),
            ColumnDef::new("Item", DataType::Varchar(15), true),
        ],
        vec![0, 1],
    )
    .with_foreign_key(ForeignKey::new("Receipt", "receipts", "RNumber"))
    .with_foreign_key(ForeignKey::new("Item", "goods", "GId"));
    catalog.add_table(Arc::new(Table::new("items", Arc::new(items))))?;

    Ok(catalog)
}

pub fn csv_file(table_name: &str) -> Option<&'static str> {
    match table_name {
        "customers" => Some(CUSTOMERS_CSV),
        "goods" => Some(GOODS_CSV),
        "receipts" => Some(RECEIPTS_CSV),
        "items" => Some(ITEMS_CSV),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("28-Oct-2007", "20071028")]
    #[case("3-Jan-2008", "20080103")]
    #[case("03-jan-2008", "20080103")]
    #[case("31-Dec-1999", "19991231")]
    #[case("1-Feb-2010", "20100201")]
    #[case(" 15-Sep-2007 ", "20070915")]
    fn test_reformat_date(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(reformat_date(input).unwrap(), expected);
    }

    #[rstest]
    #[case("2007-10-28")]
    #[case("32-Oct-2007")]
    #[case("28-Foo-2007")]
    #[case("")]
    fn test_reformat_date_rejects_malformed(#[case] input: &str) {
        assert!(matches!(
            reformat_date(input),
            Err(LoaderError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_catalog() {
        let catalog = catalog().unwrap();
        let names = catalog
            .tables()
            .iter()
            .map(|t| t.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["customers", "goods", "receipts", "items"]);
        for name in &names {
            assert!(csv_file(name).is_some());
        }
        let items = catalog.get_table("items").unwrap();
        assert_eq!(items.schema().primary_key_indices(), &vec![0, 1]);
        assert_eq!(items.schema().foreign_keys().len(), 2);
    }
}
