use pretty_assertions::assert_eq;
use relmap::{
    driver::Operation,
    stmt::{Condition, Grouping, Paging, Query, Record, Row, Value, COUNT_MARKER},
};
use tests::setup;

const COUNT_SQL: &str = "SELECT COUNT(0) FROM `orders` T \
                         LEFT JOIN `customer` J0 ON T.`CustomerId` = J0.`Id` \
                         WHERE T.`Status` = {0}";

fn row(id: i64, customer: Option<&str>) -> Row {
    let mut row = Row::new();
    row.insert("T_Id", id);
    row.insert("J0_Name", customer.map(Value::from).unwrap_or_default());
    row
}

fn orders() -> Query {
    Query::new("Order")
        .members(["Id", "Customer.Name"])
        .filter(Condition::eq("Status", "open"))
}

#[tokio::test]
async fn counts_then_fetches_the_clamped_page() {
    let (db, driver) = setup();

    driver
        .respond_scalar(25i64)
        .respond_rows(vec![row(21, Some("Ann")), row(22, None)]);

    let selection = db.select::<Record>(orders().page(9, 10));
    let records = selection.load().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].navigation("Customer").and_then(|c| c.get("Name")),
        Some(&Value::from("Ann"))
    );
    assert!(records[1].navigation("Customer").is_none());

    let paging = selection.paging().unwrap();
    assert_eq!(paging.index, 3);
    assert_eq!(paging.total, Some(25));
    assert_eq!(paging.page_count(), Some(3));

    let log = driver.log();
    assert_eq!(
        log.sql(),
        [
            COUNT_SQL.to_string(),
            "SELECT T.`Id` AS `T_Id`, J0.`Name` AS `J0_Name` FROM `orders` T \
             LEFT JOIN `customer` J0 ON T.`CustomerId` = J0.`Id` \
             WHERE T.`Status` = {0} LIMIT 20, 10"
                .to_string(),
        ]
    );
    assert!(matches!(log.ops()[0], Operation::QueryScalar(_)));
    assert_eq!(log.params(1), [Value::from("open")]);
}

#[tokio::test]
async fn grouped_page_counts_the_groups_first() {
    let (db, driver) = setup();

    let mut group = Row::new();
    group.insert("T_CustomerId", 1i64);
    group.insert("T_COUNT", 3i64);

    driver.respond_scalar(4i64).respond_rows(vec![group]);

    let query = Query::new("Order")
        .members(["CustomerId", COUNT_MARKER])
        .group(Grouping::by(["CustomerId"]))
        .page(1, 10);

    let selection = db.select::<Record>(query);
    let records = selection.load().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(selection.paging().unwrap().total, Some(4));

    let inner = "SELECT T.`CustomerId` AS `T_CustomerId`, COUNT(0) AS `T_COUNT` \
                 FROM `orders` T GROUP BY T.`CustomerId`";

    let log = driver.log();
    assert_eq!(
        log.sql(),
        [
            format!("SELECT COUNT(0) FROM ({inner}) T1"),
            format!("SELECT T1.* FROM ({inner}) T1 LIMIT 0, 10"),
        ]
    );
    assert!(matches!(log.ops()[0], Operation::QueryScalar(_)));
    assert!(matches!(log.ops()[1], Operation::QuerySql(_)));
}

#[tokio::test]
async fn known_total_skips_the_count() {
    let (db, driver) = setup();

    let query = orders().paging(Paging::page(2, 10).with_total(25));
    let records: Vec<Record> = db.all(&query).await.unwrap();

    assert!(records.is_empty());
    assert_eq!(driver.log().len(), 1);
    assert!(driver.log().sql()[0].ends_with("LIMIT 10, 10"));
}

#[tokio::test]
async fn zero_page_size_fetches_everything() {
    let (db, driver) = setup();
    driver.respond_scalar(3i64);

    let selection = db.select::<Record>(orders().page(1, 0));
    selection.load().await.unwrap();

    let sql = driver.log().sql();
    assert_eq!(sql.len(), 2);
    assert!(!sql[1].contains("LIMIT"));
    assert_eq!(selection.total().await.unwrap(), 3);
}

#[tokio::test]
async fn selection_reads_once() {
    let (db, driver) = setup();
    driver.respond_rows(vec![row(1, Some("Ann"))]);

    let selection = db.select::<Record>(orders());
    assert!(!selection.is_loaded());

    assert_eq!(selection.load().await.unwrap().len(), 1);
    assert_eq!(selection.load().await.unwrap().len(), 1);
    assert!(selection.is_loaded());
    assert_eq!(selection.paging(), None);

    assert_eq!(driver.log().len(), 1);
    assert_eq!(driver.connections(), 1);

    let records = selection.into_vec().await.unwrap();
    assert_eq!(records[0].get("Id"), Some(&Value::I64(1)));
}

#[tokio::test]
async fn unresolved_member_fails_before_any_sql() {
    let (db, driver) = setup();

    let err = db
        .all::<Record>(&Query::new("Order").members(["Buyer.Name"]))
        .await
        .unwrap_err();

    assert!(err.is_unresolved_member());
    assert!(driver.log().is_empty());
}
