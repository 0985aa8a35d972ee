use super::{schema, sql, values};
use crate::engine::{count, exists, select};

use pretty_assertions::assert_eq;
use relmap_core::stmt::{Condition, Direction, Filter, Paging, Query, Value};

#[test]
fn shared_navigation_is_joined_once() {
    let schema = schema();
    let query = Query::new("Order")
        .members(["Id", "Customer.Name"])
        .filter(Filter::and([
            Condition::eq("customer.name", "Ann"),
            Condition::is_not_null("Customer.Email"),
        ]));

    let plan = select(&schema, &query).unwrap();

    assert_eq!(
        sql(plan.select),
        "SELECT T.`Id` AS `T_Id`, J0.`Name` AS `J0_Name` FROM `orders` T \
         LEFT JOIN `customer` J0 ON T.`CustomerId` = J0.`Id` \
         WHERE J0.`Name` = {0} AND J0.`Email` IS NOT NULL"
    );
    assert_eq!(
        sql(plan.count),
        "SELECT COUNT(0) FROM `orders` T \
         LEFT JOIN `customer` J0 ON T.`CustomerId` = J0.`Id` \
         WHERE J0.`Name` = {0} AND J0.`Email` IS NOT NULL"
    );
    assert_eq!(plan.params, values(["Ann".into()]));
}

#[test]
fn empty_projection_selects_every_column() {
    let schema = schema();
    let plan = select(&schema, &Query::new("order")).unwrap();

    assert_eq!(
        sql(plan.select),
        "SELECT T.`Id` AS `T_Id`, T.`CustomerId` AS `T_CustomerId`, \
         T.`total_amount` AS `T_total_amount`, T.`Status` AS `T_Status` FROM `orders` T"
    );
}

#[test]
fn navigation_member_expands_to_target_columns() {
    let schema = schema();
    let plan = select(&schema, &Query::new("Order").members(["Id", "Customer"])).unwrap();

    assert_eq!(
        sql(plan.select),
        "SELECT T.`Id` AS `T_Id`, J0.`Id` AS `J0_Id`, J0.`Name` AS `J0_Name`, \
         J0.`Email` AS `J0_Email`, J0.`CountryId` AS `J0_CountryId` FROM `orders` T \
         LEFT JOIN `customer` J0 ON T.`CustomerId` = J0.`Id`"
    );
}

#[test]
fn membership_lowering() {
    let schema = schema();
    let query = Query::new("Order").members(["Id"]).filter(Filter::and([
        Condition::is_in("Status", ["open", "held"]),
        Condition::is_in("CustomerId", [7]),
        Condition::not_in("Id", Vec::<i64>::new()),
        Condition::not_in("Status", ["void"]),
    ]));

    let plan = select(&schema, &query).unwrap();

    assert_eq!(
        sql(plan.select),
        "SELECT T.`Id` AS `T_Id` FROM `orders` T \
         WHERE T.`Status` IN ({0}, {1}) AND T.`CustomerId` = {2} AND T.`Status` != {3}"
    );
    assert_eq!(
        plan.params,
        values(["open".into(), "held".into(), 7.into(), "void".into()])
    );
}

#[test]
fn empty_in_matches_nothing() {
    let schema = schema();
    let query = Query::new("Order")
        .members(["Id"])
        .filter(Condition::is_in("Id", Vec::<i64>::new()));

    let plan = select(&schema, &query).unwrap();
    assert_eq!(sql(plan.select), "SELECT T.`Id` AS `T_Id` FROM `orders` T WHERE 1 = 0");
}

#[test]
fn operator_lowering() {
    let schema = schema();
    let query = Query::new("Order").members(["Id"]).filter(Filter::or([
        Condition::eq("Status", "o%"),
        Condition::is_null("Status"),
        Condition::between("Total", 10.0, 20.0),
        Condition::le("Total", 5.0),
    ]));

    let plan = select(&schema, &query).unwrap();

    assert_eq!(
        sql(plan.select),
        "SELECT T.`Id` AS `T_Id` FROM `orders` T WHERE T.`Status` LIKE {0} \
         OR T.`Status` IS NULL OR T.`total_amount` BETWEEN {1} AND {2} \
         OR T.`total_amount` <= {3}"
    );
    assert_eq!(plan.params.len(), 4);
}

#[test]
fn comparison_without_value_is_rejected() {
    let schema = schema();
    let query = Query::new("Order").filter(Condition::gt("Total", Value::Null));

    let err = select(&schema, &query).unwrap_err();
    assert!(err.is_unsupported_operator());
}

#[test]
fn inner_join_under_left_join_keeps_left_rows() {
    let schema = schema();
    let query = Query::new("Order").members(["Id", "Customer.Country.Name"]);

    let plan = select(&schema, &query).unwrap();

    assert_eq!(
        sql(plan.select),
        "SELECT T.`Id` AS `T_Id`, J1.`Name` AS `J1_Name` FROM `orders` T \
         LEFT JOIN `customer` J0 ON T.`CustomerId` = J0.`Id` \
         AND EXISTS (SELECT 0 FROM `country` J1X WHERE J1X.`Id` = J0.`CountryId` LIMIT 0, 1) \
         LEFT JOIN `country` J1 ON J0.`CountryId` = J1.`Id`"
    );
}

#[test]
fn inner_join_from_root_is_left_alone() {
    let schema = schema();
    let query = Query::new("Customer").members(["Name", "Country.Name"]);

    let plan = select(&schema, &query).unwrap();

    assert_eq!(
        sql(plan.select),
        "SELECT T.`Name` AS `T_Name`, J0.`Name` AS `J0_Name` FROM `customer` T \
         INNER JOIN `country` J0 ON T.`CountryId` = J0.`Id`"
    );
}

#[test]
fn sorting_and_paging() {
    let schema = schema();
    let query = Query::new("Order")
        .members(["Id"])
        .sort("Customer.Name", Direction::Asc)
        .sort("Id", Direction::Desc);

    let mut plan = select(&schema, &query).unwrap();
    plan.apply_paging(&Paging::page(3, 10));

    assert_eq!(
        sql(plan.select),
        "SELECT T.`Id` AS `T_Id` FROM `orders` T \
         LEFT JOIN `customer` J0 ON T.`CustomerId` = J0.`Id` \
         ORDER BY J0.`Name` ASC, T.`Id` DESC LIMIT 20, 10"
    );
}

#[test]
fn sub_query_aliases_follow_outer_query() {
    let schema = schema();
    let customers = Query::new("Customer")
        .members(["Id"])
        .filter(Condition::like("Name", "A%"));

    let query = Query::new("Order")
        .members(["Id"])
        .filter(Filter::and([
            Condition::eq("Status", "open"),
            Condition::in_query("CustomerId", customers.clone()),
        ]));

    let plan = select(&schema, &query).unwrap();

    assert_eq!(
        sql(plan.select),
        "SELECT T.`Id` AS `T_Id` FROM `orders` T WHERE T.`Status` = {0} \
         AND T.`CustomerId` IN (SELECT T1.`Id` FROM `customer` T1 WHERE T1.`Name` LIKE {1})"
    );
    assert_eq!(plan.params, values(["open".into(), "A%".into()]));

    let paged = Query::new("Order")
        .members(["Id"])
        .filter(Condition::in_query("CustomerId", customers.page(1, 5)));

    let plan = select(&schema, &paged).unwrap();

    assert_eq!(
        sql(plan.select),
        "SELECT T.`Id` AS `T_Id` FROM `orders` T WHERE T.`CustomerId` IN \
         (SELECT T2.`T1_Id` FROM (SELECT T1.`Id` AS `T1_Id` FROM `customer` T1 \
         WHERE T1.`Name` LIKE {0} LIMIT 0, 5) T2)"
    );
}

#[test]
fn sub_query_page_past_the_end_still_compiles() {
    let schema = schema();
    let query = Query::new("Order").members(["Id"]).filter(Condition::in_query(
        "CustomerId",
        Query::new("Customer").members(["Id"]).page(u64::MAX, 10),
    ));

    let plan = select(&schema, &query).unwrap();

    assert!(sql(plan.select).ends_with(&format!("LIMIT {}, 10) T2)", u64::MAX)));
}

#[test]
fn sub_query_must_project_one_member() {
    let schema = schema();
    let query = Query::new("Order").filter(Condition::in_query(
        "CustomerId",
        Query::new("Customer").members(["Id", "Name"]),
    ));

    let err = select(&schema, &query).unwrap_err();
    assert!(err.is_unsupported_feature());
}

#[test]
fn unknown_navigation_is_unresolved() {
    let schema = schema();
    let err = select(&schema, &Query::new("Order").members(["Buyer.Name"])).unwrap_err();

    assert!(err.is_unresolved_member());
    assert_eq!(
        err.to_string(),
        "cannot resolve member `Buyer.Name` on `Order`: `Buyer` is not a navigation of `Order`"
    );

    let err = select(&schema, &Query::new("Order").members(["Note"])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot resolve member `Note` on `Order`: `Note` is not mapped to a column"
    );
}

#[test]
fn count_and_exists() {
    let schema = schema();

    let (select, params) = count(&schema, "Order", &Filter::all(), &["Customer.Name"]).unwrap();
    assert_eq!(
        sql(select),
        "SELECT COUNT(J0.`Name`) FROM `orders` T \
         LEFT JOIN `customer` J0 ON T.`CustomerId` = J0.`Id`"
    );
    assert!(params.is_empty());

    let (select, _) = count(&schema, "Order", &Filter::all(), &["Status", "CustomerId"]).unwrap();
    assert_eq!(
        sql(select),
        "SELECT COUNT(CONCAT(T.`Status`, T.`CustomerId`)) FROM `orders` T"
    );

    let (select, params) = exists(&schema, "Order", &Filter::from(Condition::eq("Status", "open"))).unwrap();
    assert_eq!(
        sql(select),
        "SELECT 0 FROM `orders` T WHERE T.`Status` = {0} LIMIT 0, 1"
    );
    assert_eq!(params, values(["open".into()]));
}
