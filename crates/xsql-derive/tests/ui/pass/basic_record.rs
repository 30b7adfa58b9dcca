use xsql::{Record, Scalar};

#[derive(Debug, Default, Record)]
pub struct User {
    #[xsql("id")]
    id: i64,
    #[xsql(column = "user_name")]
    name: String,
    #[xsql("created_at")]
    created_at: chrono::DateTime<chrono::Utc>,
}

fn main() {
    let row = xsql::Row::from_pairs([("id", Scalar::I64(1)), ("user_name", Scalar::from("ada"))]);
    let mut user = User::default();
    xsql::map_row(&mut user, &row, &xsql::CoercionConfig::default()).unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.name, "ada");
    let _ = user.created_at;
}
