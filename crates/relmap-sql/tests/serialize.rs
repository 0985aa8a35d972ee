use pretty_assertions::assert_eq;
use relmap_core::driver::operation::Transaction;
use relmap_sql::{
    stmt::{
        Assignment, BinaryOp, Delete, Direction, Expr, Insert, Join, JoinKind, Limit, OrderBy,
        Select, SelectItem, Source, Statement, TableName, Update,
    },
    Serializer,
};

fn order_select() -> Select {
    let mut select = Select::new(Source::table(
        TableName::qualified(Some("sales".into()), "orders"),
        "T",
    ));
    select.items = vec![
        SelectItem::aliased(Expr::column("T", "Id"), "T_Id"),
        SelectItem::aliased(Expr::column("J0", "Name"), "J0_Name"),
    ];
    select.joins = vec![Join {
        kind: JoinKind::Left,
        source: Source::table(TableName::new("customer"), "J0"),
        on: Expr::eq(Expr::column("T", "CustomerId"), Expr::column("J0", "Id")),
    }];
    select.filter = Some(Expr::And(vec![
        Expr::binary_op(Expr::column("J0", "Name"), BinaryOp::Like, Expr::Placeholder(0)),
        Expr::Or(vec![
            Expr::binary_op(Expr::column("T", "Total"), BinaryOp::Gt, Expr::Placeholder(1)),
            Expr::IsNull {
                expr: Box::new(Expr::column("T", "Total")),
                negate: false,
            },
        ]),
    ]));
    select.order_by = vec![OrderBy {
        expr: Expr::column("T", "Id"),
        direction: Direction::Desc,
    }];
    select.limit = Some(Limit {
        offset: 20,
        count: 10,
    });
    select
}

#[test]
fn select_mysql() {
    let sql = Serializer::mysql().serialize(&order_select().into());

    assert_eq!(
        sql,
        "SELECT T.`Id` AS `T_Id`, J0.`Name` AS `J0_Name` FROM `sales`.`orders` T \
         LEFT JOIN `customer` J0 ON T.`CustomerId` = J0.`Id` \
         WHERE J0.`Name` LIKE {0} AND (T.`Total` > {1} OR T.`Total` IS NULL) \
         ORDER BY T.`Id` DESC LIMIT 20, 10"
    );
}

#[test]
fn select_postgresql() {
    let sql = Serializer::postgresql().serialize(&order_select().into());

    assert_eq!(
        sql,
        "SELECT T.\"Id\" AS \"T_Id\", J0.\"Name\" AS \"J0_Name\" FROM \"sales\".\"orders\" T \
         LEFT JOIN \"customer\" J0 ON T.\"CustomerId\" = J0.\"Id\" \
         WHERE J0.\"Name\" LIKE {0} AND (T.\"Total\" > {1} OR T.\"Total\" IS NULL) \
         ORDER BY T.\"Id\" DESC LIMIT 10 OFFSET 20"
    );
}

#[test]
fn grouped_derived_table() {
    let mut inner = Select::new(Source::table(TableName::new("product"), "T"));
    inner.items = vec![
        SelectItem::aliased(Expr::column("T", "CategoryId"), "T_CategoryId"),
        SelectItem::aliased(Expr::CountAll, "T_COUNT"),
        SelectItem::aliased(
            Expr::func("SUM", vec![Expr::column("T", "Price")]),
            "T_SUM_Price",
        ),
    ];
    inner.group_by = vec![Expr::column("T", "CategoryId")];
    inner.having = Some(Expr::binary_op(
        Expr::CountAll,
        BinaryOp::Gt,
        Expr::Placeholder(0),
    ));

    let mut outer = Select::new(Source::derived(inner, "T1"));
    outer.items = vec![
        SelectItem::aliased(Expr::column("J0", "Name"), "J0_Name"),
        SelectItem::Wildcard("T1".into()),
    ];
    outer.joins = vec![Join {
        kind: JoinKind::Inner,
        source: Source::table(TableName::new("category"), "J0"),
        on: Expr::eq(Expr::column("T1", "T_CategoryId"), Expr::column("J0", "Id")),
    }];

    assert_eq!(
        Serializer::mysql().serialize(&outer.into()),
        "SELECT J0.`Name` AS `J0_Name`, T1.* FROM (SELECT T.`CategoryId` AS `T_CategoryId`, \
         COUNT(0) AS `T_COUNT`, SUM(T.`Price`) AS `T_SUM_Price` FROM `product` T \
         GROUP BY T.`CategoryId` HAVING COUNT(0) > {0}) T1 \
         INNER JOIN `category` J0 ON T1.`T_CategoryId` = J0.`Id`"
    );
}

#[test]
fn membership_and_exists() {
    let mut exists = Select::new(Source::table(TableName::new("address"), "J1X"));
    exists.items = vec![Expr::Literal(0).into()];
    exists.filter = Some(Expr::eq(
        Expr::column("J1X", "CustomerId"),
        Expr::column("J0", "Id"),
    ));
    exists.limit = Some(Limit {
        offset: 0,
        count: 1,
    });

    let expr = Expr::And(vec![
        Expr::InList {
            expr: Box::new(Expr::column("T", "Status")),
            list: vec![Expr::Placeholder(0), Expr::Placeholder(1)],
            negate: true,
        },
        Expr::Between {
            expr: Box::new(Expr::column("T", "Total")),
            low: Box::new(Expr::Placeholder(2)),
            high: Box::new(Expr::Placeholder(3)),
        },
        Expr::Exists(Box::new(exists)),
        Expr::always_false(),
    ]);

    assert_eq!(
        Serializer::mysql().serialize_expr(&expr),
        "T.`Status` NOT IN ({0}, {1}) AND T.`Total` BETWEEN {2} AND {3} \
         AND EXISTS (SELECT 0 FROM `address` J1X WHERE J1X.`CustomerId` = J0.`Id` LIMIT 0, 1) \
         AND 1 = 0"
    );
}

#[test]
fn dml_statements() {
    let serializer = Serializer::mysql();

    let insert = Statement::Insert(Insert {
        table: TableName::new("orders"),
        columns: vec!["CustomerId".into(), "Total".into()],
        values: vec![Expr::Placeholder(0), Expr::Placeholder(1)],
    });
    assert_eq!(
        serializer.serialize(&insert),
        "INSERT INTO `orders` (`CustomerId`, `Total`) VALUES ({0}, {1})"
    );

    let update = Statement::Update(Update {
        table: TableName::new("orders"),
        assignments: vec![
            Assignment {
                column: "Total".into(),
                value: Expr::binary_op(
                    Expr::column("", "Total"),
                    BinaryOp::Add,
                    Expr::Placeholder(1),
                ),
            },
            Assignment {
                column: "Note".into(),
                value: Expr::Null,
            },
        ],
        filter: Some(Expr::eq(Expr::column("", "Id"), Expr::Placeholder(0))),
    });
    assert_eq!(
        serializer.serialize(&update),
        "UPDATE `orders` SET `Total` = `Total` + {1}, `Note` = NULL WHERE `Id` = {0}"
    );

    let delete = Statement::Delete(Delete {
        table: TableName::new("orders"),
        filter: Some(Expr::binary_op(
            Expr::column("", "Id"),
            BinaryOp::Ne,
            Expr::Placeholder(0),
        )),
    });
    assert_eq!(
        serializer.serialize(&delete),
        "DELETE FROM `orders` WHERE `Id` != {0}"
    );
}

#[test]
fn identifiers_escape_quotes() {
    assert_eq!(Serializer::mysql().ident("we`ird"), "`we``ird`");
    assert_eq!(Serializer::sqlite().ident("a\"b"), "\"a\"\"b\"");
}

#[test]
fn transactions() {
    assert_eq!(
        Serializer::mysql().serialize_transaction(&Transaction::Start),
        "START TRANSACTION"
    );
    assert_eq!(
        Serializer::postgresql().serialize_transaction(&Transaction::Start),
        "BEGIN"
    );
    assert_eq!(
        Serializer::sqlite().serialize_transaction(&Transaction::Rollback),
        "ROLLBACK"
    );
}
