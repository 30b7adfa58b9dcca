use std::collections::HashMap;

use xsql::Record;

struct Cache;

#[derive(Default, Record)]
pub struct Session {
    #[xsql("token")]
    token: String,
    #[xsql("-")]
    scratch: HashMap<String, Vec<u8>>,
    #[xsql("_")]
    cache: Option<Box<Cache>>,
    #[xsql("")]
    blank: f64,
    loaded: bool,
}

fn main() {
    let descriptor = <Session as xsql::record::Record>::descriptor().unwrap();
    assert_eq!(descriptor.mapped_columns().collect::<Vec<_>>(), vec!["token"]);
    let s = Session::default();
    let _ = (s.token, s.scratch, s.cache.is_none(), s.blank, s.loaded);
}
