use pretty_assertions::assert_eq;
use relmap::{
    stmt::{Condition, Filter, Query, Record, Row},
    Db, Descriptor, Model, Result, Schema,
};
use std::sync::LazyLock;
use tests::{setup, ScriptedDriver};

#[derive(Debug, PartialEq)]
struct Order {
    id: i64,
    number: String,
    total: f64,
    status: Option<String>,
}

impl Model for Order {
    fn load(record: Record, schema: &Schema) -> Result<Self> {
        static DESCRIPTOR: LazyLock<Descriptor<Order>> = LazyLock::new(|| {
            Descriptor::new("Order", |args| {
                Ok(Order {
                    id: 0,
                    number: args.take("number")?,
                    total: 0.0,
                    status: None,
                })
            })
            .field("Id", |order: &mut Order, id| order.id = id)
            .field("Total", |order: &mut Order, total| order.total = total)
            .field("Status", |order: &mut Order, status| order.status = Some(status))
        });

        DESCRIPTOR.load(record, schema)
    }
}

#[tokio::test]
async fn rows_load_into_models() {
    let (db, driver) = setup();

    let mut row = Row::new();
    row.insert("T_Id", 7i64);
    row.insert("T_CustomerId", 1i64);
    row.insert("T_order_no", "A-7");
    row.insert("T_total_amount", 99.5);
    row.insert("T_Status", relmap::stmt::Value::Null);
    driver.respond_rows(vec![row]);

    let orders = db.select::<Order>(Query::new("Order")).into_vec().await.unwrap();

    assert_eq!(
        orders,
        [Order {
            id: 7,
            number: "A-7".to_string(),
            total: 99.5,
            status: None,
        }]
    );
    assert_eq!(
        driver.log().sql(),
        ["SELECT T.`Id` AS `T_Id`, T.`CustomerId` AS `T_CustomerId`, \
          T.`order_no` AS `T_order_no`, T.`total_amount` AS `T_total_amount`, \
          T.`Status` AS `T_Status` FROM `orders` T"]
    );
}

#[tokio::test]
async fn count_and_exists() {
    let (db, driver) = setup();
    driver
        .respond_scalar(7i64)
        .respond_scalar(relmap::stmt::Value::Null)
        .respond_scalar(0i64);

    let open = Filter::from(Condition::eq("Status", "open"));

    assert_eq!(db.count("Order", &open, &[]).await.unwrap(), 7);
    assert!(!db.exists("Order", &open).await.unwrap());
    assert!(db.exists("Order", &Filter::all()).await.unwrap());

    assert_eq!(
        driver.log().sql(),
        [
            "SELECT COUNT(0) FROM `orders` T WHERE T.`Status` = {0}",
            "SELECT 0 FROM `orders` T WHERE T.`Status` = {0} LIMIT 0, 1",
            "SELECT 0 FROM `orders` T LIMIT 0, 1",
        ]
    );
}

#[tokio::test]
async fn non_numeric_count_is_an_invalid_result() {
    let (db, driver) = setup();
    driver.respond_scalar("many");

    let err = db.count("Order", &Filter::all(), &[]).await.unwrap_err();
    assert!(err.is_invalid_result());
}

#[tokio::test]
async fn schema_is_published_once_on_first_use() {
    let driver = ScriptedDriver::new();
    let db = Db::builder().mapping(tests::MAPPING).build(driver.clone());

    let first = db.schema().await.unwrap().clone();
    let second = db.schema().await.unwrap().clone();

    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert!(first.entity_by_name("customer").is_some());
    assert_eq!(driver.connections(), 0);
}

#[tokio::test]
async fn bad_mapping_fails_every_request() {
    let driver = ScriptedDriver::new();
    let db = Db::builder()
        .mapping(tests::MAPPING)
        .mapping(r#"{ "entities": [{ "name": "Order" }] }"#)
        .build(driver.clone());

    let err = db.schema().await.unwrap_err();
    assert!(err.is_invalid_mapping());

    let err = db.count("Order", &Filter::all(), &[]).await.unwrap_err();
    assert!(err.is_invalid_mapping());
    assert!(driver.log().is_empty());
}
