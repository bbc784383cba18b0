use url::form_urlencoded;

use crate::parameters::{Parameters, Value};

///Decode an `application/x-www-form-urlencoded` string. Keys with brackets
///(`a[b][c]`) are expanded into nested maps and an empty pair of brackets
///appends to the map, using the next free index as key.
pub fn parse_parameters(source: &str) -> Parameters {
    let mut parameters = Parameters::new();

    for (name, value) in form_urlencoded::parse(source.as_bytes()) {
        let (base, path) = split_key(&name);
        insert_nested(&mut parameters, base.to_owned(), &path, value.into_owned());
    }

    parameters
}

//Splits `a[b][c]` into `a` and `[b, c]`. A key without a well formed bracket
//suffix is returned whole.
fn split_key(key: &str) -> (&str, Vec<&str>) {
    let open = match key.find('[') {
        Some(open) if open > 0 => open,
        _ => return (key, vec![]),
    };

    let mut path = vec![];
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        match inner.find(']') {
            Some(close) => {
                path.push(&inner[..close]);
                rest = &inner[close + 1..];
            },
            None => break,
        }
    }

    if path.is_empty() {
        (key, path)
    } else {
        (&key[..open], path)
    }
}

fn insert_nested(parameters: &mut Parameters, key: String, path: &[&str], value: String) {
    let (next, rest) = match path.split_first() {
        Some(split) => split,
        None => {
            parameters.insert(key, value);
            return;
        },
    };

    let entry = parameters.entry(key).or_insert_with(|| Value::Map(Parameters::new()));
    if !entry.is_map() {
        *entry = Value::Map(Parameters::new());
    }

    if let Value::Map(ref mut inner) = *entry {
        let next = if next.is_empty() {
            inner.len().to_string()
        } else {
            (*next).to_owned()
        };
        insert_nested(inner, next, rest, value);
    }
}

#[cfg(test)]
mod test {
    use super::parse_parameters;

    #[test]
    fn parsing_parameters() {
        let parameters = parse_parameters("a=1&aa=2&ab=202");
        assert_eq!(parameters.get_str("a"), Some("1"));
        assert_eq!(parameters.get_str("aa"), Some("2"));
        assert_eq!(parameters.get_str("ab"), Some("202"));
    }

    #[test]
    fn parsing_parameters_with_plus() {
        let parameters = parse_parameters("a=1&aa=2+%2B+extra+meat&ab=202+fifth+avenue");
        assert_eq!(parameters.get_str("a"), Some("1"));
        assert_eq!(parameters.get_str("aa"), Some("2 + extra meat"));
        assert_eq!(parameters.get_str("ab"), Some("202 fifth avenue"));
    }

    #[test]
    fn parsing_strange_parameters() {
        let parameters = parse_parameters("a=1=2&=2&ab=");
        assert_eq!(parameters.get_str("a"), Some("1=2"));
        assert_eq!(parameters.get_str(""), Some("2"));
        assert_eq!(parameters.get_str("ab"), Some(""));
    }

    #[test]
    fn parsing_nested_parameters() {
        let parameters = parse_parameters("user[name]=alice&user[address][city]=Oslo&tags[]=a&tags[]=b");
        assert_eq!(parameters, parameters!{
            "user" => {
                "name" => "alice",
                "address" => { "city" => "Oslo" }
            },
            "tags" => { "0" => "a", "1" => "b" }
        });
    }

    #[test]
    fn parsing_broken_brackets() {
        let parameters = parse_parameters("a[b=1&[c]=2&d[e]x=3");
        assert_eq!(parameters.get_str("a[b"), Some("1"));
        assert_eq!(parameters.get_str("[c]"), Some("2"));
        assert_eq!(parameters.get("d").and_then(|d| d.as_map()).and_then(|d| d.get_str("e")), Some("3"));
    }

    #[test]
    fn nested_value_replaces_scalar() {
        let parameters = parse_parameters("a=1&a[b]=2");
        assert_eq!(parameters, parameters!{ "a" => { "b" => "2" } });
    }
}
