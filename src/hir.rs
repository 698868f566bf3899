/// A single parameter occurrence, as found in the query string.
///
/// Nothing is validated at this level, the name is not looked up and the value is not parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parameter<'a> {
    pub name: &'a str,
    pub modifier: Option<&'a str>,
    pub value: &'a str,
}

impl<'a> Parameter<'a> {
    pub fn new(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            modifier: None,
            value,
        }
    }

    /// Create a parameter from an already decoded key/value pair, splitting `name:modifier`.
    pub fn from_pair(key: &'a str, value: &'a str) -> Self {
        let (name, modifier) = match key.split_once(':') {
            Some((name, modifier)) => (name, Some(modifier)),
            None => (key, None),
        };

        Self {
            name,
            modifier,
            value,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Query<'a> {
    pub parameters: Vec<Parameter<'a>>,
}
