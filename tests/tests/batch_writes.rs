use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use relmap::{
    driver::{operation::Transaction, Operation},
    stmt::{Condition, Filter, Value, Write},
    Error,
};
use tests::setup;

fn order(customer: i64, total: f64) -> IndexMap<String, Value> {
    IndexMap::from([
        ("CustomerId".to_string(), Value::from(customer)),
        ("Total".to_string(), Value::from(total)),
    ])
}

#[tokio::test]
async fn insert_many_continues_past_failures() {
    let (db, driver) = setup();

    driver
        .respond_count(1)
        .respond_scalar(41i64)
        .respond(Err(Error::duplicate_key("orders.PRIMARY")))
        .respond_count(1)
        .respond_scalar(43i64);

    let mut rows = vec![order(1, 10.0), order(1, 20.0), order(2, 30.0)];
    let outcome = db.insert_many("Order", &mut rows, &[]).await.unwrap();

    assert_eq!(outcome.count, 2);
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].is_duplicate_key());
    assert!(!outcome.is_complete());

    // Generated keys are written back into the inserted rows
    assert_eq!(rows[0].get("Id"), Some(&Value::I64(41)));
    assert_eq!(rows[1].get("Id"), None);
    assert_eq!(rows[2].get("Id"), Some(&Value::I64(43)));

    let ops = driver.log().ops();
    assert_eq!(ops.len(), 5);
    assert!(matches!(ops[1], Operation::LastInsertId(_)));
    assert_eq!(
        ops[0].sql(),
        Some("INSERT INTO `orders` (`CustomerId`, `total_amount`) VALUES ({0}, {1})")
    );

    // One connection carries the whole batch
    assert_eq!(driver.connections(), 1);
}

#[tokio::test]
async fn failure_inside_a_transaction_aborts_the_batch() {
    let (db, driver) = setup();

    driver
        .respond_count(0)
        .respond(Err(Error::duplicate_key("orders.PRIMARY")));

    let mut session = db.session().await.unwrap();
    session.begin().await.unwrap();
    assert!(session.in_transaction());

    let mut rows = vec![order(1, 10.0), order(2, 20.0)];
    let err = session.insert_many("Order", &mut rows, &[]).await.unwrap_err();
    assert!(err.is_duplicate_key());

    session.rollback().await.unwrap();
    assert!(!session.in_transaction());

    let log = driver.log();
    assert_eq!(log.transactions(), [Transaction::Start, Transaction::Rollback]);

    // The second row was never attempted
    assert_eq!(log.len(), 3);
}

#[tokio::test]
async fn committed_session_runs_on_one_connection() {
    let (db, driver) = setup();
    driver.respond_count(0).respond_count(2).respond_count(0);

    let mut session = db.session().await.unwrap();
    session.begin().await.unwrap();
    let deleted = session
        .delete("Order", &Filter::from(Condition::eq("Status", "void")))
        .await
        .unwrap();
    session.commit().await.unwrap();

    assert_eq!(deleted, 2);
    assert_eq!(driver.connections(), 1);
    assert_eq!(
        driver.log().sql(),
        ["DELETE FROM `orders` WHERE `Status` = {0}"]
    );
    assert_eq!(
        driver.log().transactions(),
        [Transaction::Start, Transaction::Commit]
    );
}

#[tokio::test]
async fn update_many_matches_rows_by_key() {
    let (db, driver) = setup();

    let rows = vec![
        IndexMap::from([
            ("Id".to_string(), Write::set(1)),
            ("Status".to_string(), Write::set("paid")),
        ]),
        // Assigns none of the members, so no statement is sent
        IndexMap::from([("Id".to_string(), Write::set(2))]),
        IndexMap::from([
            ("Id".to_string(), Write::set(3)),
            ("Total".to_string(), Write::add("Total", 5)),
        ]),
    ];

    let outcome = db
        .update_many("Order", &rows, &Filter::all(), &["Status", "Total"])
        .await
        .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.count, 2);

    let log = driver.log();
    assert_eq!(
        log.sql(),
        [
            "UPDATE `orders` SET `Status` = {1} WHERE `Id` = {0}",
            "UPDATE `orders` SET `total_amount` = `total_amount` + {1} WHERE `Id` = {0}",
        ]
    );
    assert_eq!(log.params(0), [Value::from(1), Value::from("paid")]);
}

#[tokio::test]
async fn update_many_needs_members() {
    let (db, driver) = setup();

    let err = db
        .update_many("Order", &[], &Filter::all(), &[])
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "update of `Order` names no members");
    assert!(driver.log().is_empty());
}

#[tokio::test]
async fn missing_key_is_reported_per_row() {
    let (db, _driver) = setup();

    let rows = vec![IndexMap::from([("Status".to_string(), Write::set("paid"))])];
    let outcome = db
        .update_many("Order", &rows, &Filter::all(), &["Status"])
        .await
        .unwrap();

    assert_eq!(outcome.count, 0);
    assert_eq!(
        outcome.failures[0].to_string(),
        "row has no value for key `Id` of `Order`"
    );
}
