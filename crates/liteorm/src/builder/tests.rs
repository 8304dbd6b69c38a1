use super::*;
use crate::condition::Condition;
use crate::options::QueryOptions;
use crate::record::{Record, Records};
use crate::schema::{ColumnDescriptor, TableColumns};
use crate::value::Value;
use crate::monitor::QueryType;

fn posts() -> TableColumns {
    TableColumns::new([
        ColumnDescriptor::new("id", "int(11)").auto_increment(),
        ColumnDescriptor::new("title", "varchar(255)"),
        ColumnDescriptor::new("author", "varchar(255)"),
    ])
}

fn articles() -> TableColumns {
    TableColumns::new([
        ColumnDescriptor::new("id", "int(10) unsigned").auto_increment(),
        ColumnDescriptor::new("title", "varchar(255)"),
        ColumnDescriptor::new("subtitle", "varchar(255)").nullable(true),
        ColumnDescriptor::new("views", "int(11)"),
        ColumnDescriptor::new("rating", "double"),
    ])
}

#[test]
fn test_insert_example() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    let sql = t
        .insert([("title", "hello world"), ("author", "John Doe")])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO `posts` (`id`,`title`,`author`) VALUES (NULL,'hello world','John Doe');"
    );
}

#[test]
fn test_update_example() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    let sql = t
        .update(4, [("author", "John Smith")], QueryOptions::new().limit(1))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE `posts` SET `author` = 'John Smith' WHERE `id` = 4 LIMIT 1;"
    );
}

#[test]
fn test_find_all_example() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    let sql = t
        .find(
            [("author", "John Smith")],
            [("order", "id DESC"), ("limit", "15")],
        )
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM `posts` WHERE `author` = 'John Smith' ORDER BY `id` DESC LIMIT 15;"
    );
}

#[test]
fn test_simple_select() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    assert_eq!(t.find((), ()).to_sql().unwrap(), "SELECT * FROM `posts`;");
}

#[test]
fn test_select_columns_and_joins() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    let opts = QueryOptions::new()
        .select("posts.*, users.name")
        .joins("LEFT JOIN users ON users.id = posts.user_id");
    assert_eq!(
        t.find(3, opts).to_sql().unwrap(),
        "SELECT posts.*, users.name FROM `posts` LEFT JOIN users ON users.id = posts.user_id WHERE `id` = 3;"
    );
}

#[test]
fn test_raw_options() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    assert_eq!(
        t.find("title LIKE 'a%'", "ORDER BY id LIMIT 2").to_sql().unwrap(),
        "SELECT * FROM `posts` WHERE title LIKE 'a%' ORDER BY id LIMIT 2;"
    );
}

#[test]
fn test_count() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    assert_eq!(
        t.count([("author", "x")], ()).to_sql().unwrap(),
        "SELECT COUNT(*) FROM `posts` WHERE `author` = 'x';"
    );
    let grouped = QueryOptions::new().select("author").group("author");
    assert_eq!(
        t.count((), grouped).to_sql().unwrap(),
        "SELECT COUNT(*), author FROM `posts` GROUP BY author;"
    );
}

#[test]
fn test_delete() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    assert_eq!(
        t.delete(7, QueryOptions::new().limit(1)).to_sql().unwrap(),
        "DELETE FROM `posts` WHERE `id` = 7 LIMIT 1;"
    );
    assert_eq!(t.delete((), ()).to_sql().unwrap(), "DELETE FROM `posts`;");
    let or = QueryOptions::new().operator("OR");
    assert_eq!(
        t.delete([("author", "a"), ("title", "b")], or).to_sql().unwrap(),
        "DELETE FROM `posts` WHERE `author` = 'a' OR `title` = 'b';"
    );
}

#[test]
fn test_insert_defaults_per_column() {
    let cols = articles();
    let t = TableRef::new("articles", "id", &cols);
    let sql = t.insert([("title", "x")]).to_sql().unwrap();
    assert_eq!(
        sql,
        "INSERT INTO `articles` (`id`,`title`,`subtitle`,`views`,`rating`) VALUES (NULL,'x',NULL,'','');"
    );
}

#[test]
fn test_insert_null_counts_as_missing_and_unknown_keys_ignored() {
    let cols = articles();
    let t = TableRef::new("articles", "id", &cols);
    let record = Record::new()
        .set("title", Value::Null)
        .set("views", 3)
        .set("bogus", "ignored");
    assert_eq!(
        t.insert(record).to_sql().unwrap(),
        "INSERT INTO `articles` (`id`,`title`,`subtitle`,`views`,`rating`) VALUES (NULL,'',NULL,3,'');"
    );
}

#[test]
fn test_insert_explicit_id_and_many_rows() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    let rows = vec![
        Record::from([("id", Value::from(10)), ("title", Value::from("a"))]),
        Record::from([("title", "b"), ("author", "c")]),
    ];
    let builder = t.insert(rows);
    assert_eq!(builder.row_count(), 2);
    assert_eq!(
        builder.to_sql().unwrap(),
        "INSERT INTO `posts` (`id`,`title`,`author`) VALUES (10,'a',''),(NULL,'b','c');"
    );
}

#[test]
fn test_insert_rejects_empty_input() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    assert!(t.insert(Records::default()).build().unwrap_err().is_rejected());
    assert!(t.insert(Record::new()).build().unwrap_err().is_rejected());
}

#[test]
fn test_insert_rejects_unknown_schema() {
    let cols = TableColumns::default();
    let t = TableRef::new("posts", "id", &cols);
    assert!(t.insert([("title", "x")]).build().unwrap_err().is_rejected());
}

#[test]
fn test_update_requires_condition() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    let err = t.update((), [("title", "x")], ()).build().unwrap_err();
    assert!(err.is_rejected());
    // numeric key with a non-numeric value compiles to nothing
    let err = t
        .update([("0", "abc")], [("title", "x")], ())
        .build()
        .unwrap_err();
    assert!(err.is_rejected());
}

#[test]
fn test_update_requires_assignable_column() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    assert!(t.update(1, [("id", 5)], ()).build().is_err());
    assert!(t.update(1, [("nope", 5)], ()).build().is_err());
    assert!(t.update(1, Record::new(), ()).build().is_err());
}

#[test]
fn test_update_nulls_and_schema_order() {
    let cols = articles();
    let t = TableRef::new("articles", "id", &cols);
    let record = Record::new()
        .set("views", Value::Null)
        .set("subtitle", Value::Null)
        .set("title", "t");
    assert_eq!(
        t.update([("title", "old")], record, ()).to_sql().unwrap(),
        "UPDATE `articles` SET `title` = 't', `subtitle` = NULL, `views` = '' WHERE `title` = 'old';"
    );
}

#[test]
fn test_update_ignores_other_options() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    let opts = QueryOptions::new().order("id").limit(5);
    assert_eq!(
        t.update(2, [("title", "x")], opts).to_sql().unwrap(),
        "UPDATE `posts` SET `title` = 'x' WHERE `id` = 2 LIMIT 5;"
    );
}

#[test]
fn test_increment() {
    let cols = articles();
    let t = TableRef::new("articles", "id", &cols);
    assert_eq!(
        t.increment(5, "views", 1, ()).to_sql().unwrap(),
        "UPDATE `articles` SET `views` = `views` + 1 WHERE `id` = 5;"
    );
    assert_eq!(
        t.increment(5, "views", -3, QueryOptions::new().limit(1)).to_sql().unwrap(),
        "UPDATE `articles` SET `views` = `views` + -3 WHERE `id` = 5 LIMIT 1;"
    );
}

#[test]
fn test_update_and_increment_append_raw_options() {
    let cols = articles();
    let t = TableRef::new("articles", "id", &cols);
    assert_eq!(
        t.update(4, [("title", "x")], "LIMIT 5").to_sql().unwrap(),
        "UPDATE `articles` SET `title` = 'x' WHERE `id` = 4 LIMIT 5;"
    );
    assert_eq!(
        t.update(4, [("title", "x")], QueryOptions::raw("LIMIT 1; DROP TABLE articles"))
            .to_sql()
            .unwrap(),
        "UPDATE `articles` SET `title` = 'x' WHERE `id` = 4 LIMIT 1;"
    );
    assert_eq!(
        t.increment([("title", "x")], "views", 2, "ORDER BY id DESC LIMIT 3")
            .to_sql()
            .unwrap(),
        "UPDATE `articles` SET `views` = `views` + 2 WHERE `title` = 'x' ORDER BY id DESC LIMIT 3;"
    );
}

#[test]
fn test_increment_coerces_amount() {
    let cols = articles();
    let t = TableRef::new("articles", "id", &cols);
    assert_eq!(t.increment(1, "views", "abc", ()).amount(), 1);
    assert_eq!(t.increment(1, "views", "4", ()).amount(), 4);
    assert_eq!(t.increment(1, "views", 2.5, ()).amount(), 1);
    assert_eq!(t.increment(1, "views", Value::Null, ()).amount(), 1);
}

#[test]
fn test_increment_rejects_non_integer_columns() {
    let cols = articles();
    let t = TableRef::new("articles", "id", &cols);
    assert!(t.increment(1, "title", 1, ()).build().unwrap_err().is_rejected());
    assert!(t.increment(1, "rating", 1, ()).build().unwrap_err().is_rejected());
    assert!(t.increment(1, "missing", 1, ()).build().unwrap_err().is_rejected());
}

#[test]
fn test_equivalent_condition_forms_build_same_select() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    let a = t.find(3, ()).to_sql().unwrap();
    let b = t.find([("id", 3)], ()).to_sql().unwrap();
    let c = t.find(Condition::raw("`id` = 3"), ()).to_sql().unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn test_statement_query_type() {
    let cols = posts();
    let t = TableRef::new("posts", "id", &cols);
    assert_eq!(t.find(1, ()).build().unwrap().query_type(), QueryType::Select);
    assert_eq!(t.delete(1, ()).build().unwrap().query_type(), QueryType::Delete);
    assert_eq!(
        t.insert([("title", "x")]).build().unwrap().query_type(),
        QueryType::Insert
    );
}

#[test]
fn test_custom_table_and_key_names_are_quoted() {
    let cols = TableColumns::new([
        ColumnDescriptor::new("post_id", "bigint(20)").auto_increment(),
        ColumnDescriptor::new("body", "text"),
    ]);
    let t = TableRef::new("blog posts", "post_id", &cols);
    assert_eq!(
        t.update(9, [("body", "hi")], ()).to_sql().unwrap(),
        "UPDATE `blog posts` SET `body` = 'hi' WHERE `post_id` = 9;"
    );
}
