use xsql::{Coerce, Record};

#[derive(Debug, Default, Record)]
pub struct Keyed<K>
where
    K: Coerce + Default + 'static,
{
    #[xsql("key")]
    key: K,
    #[xsql("type")]
    r#type: Option<String>,
}

fn main() {
    let row = xsql::Row::from_pairs([("key", xsql::Scalar::U8(3)), ("type", xsql::Scalar::from("t"))]);
    let mut keyed = Keyed::<u32>::default();
    xsql::map_row(&mut keyed, &row, &xsql::CoercionConfig::default()).unwrap();
    assert_eq!(keyed.key, 3);
    assert_eq!(keyed.r#type.as_deref(), Some("t"));
}
