//!Route pattern compilation.

use phf::phf_set;

use self::Token::{Numbered, Sequence, Static, Variable};

static METHODS: phf::Set<&'static str> = phf_set! {
    "GET",
    "POST",
    "PUT",
    "DELETE",
    "HEAD",
    "OPTIONS",
    "PATCH",
    "TRACE",
    "CONNECT",
};

///A single part of a route pattern.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Token<'a> {
    ///A literal segment, that has to be matched exactly.
    Static(&'a str),
    ///A variable segment (`$Name` or `$Name!`). A variable without a name
    ///matches, but its value is discarded.
    Variable {
        ///The label of the variable.
        name: &'a str,
        ///Required variables (`$Name!`) fail the match if there is no segment
        ///to bind.
        required: bool,
    },
    ///A trailing wildcard (`$*`), that captures the rest of the path as one
    ///value.
    Sequence,
    ///A trailing wildcard (`$@`), that captures each remaining segment as
    ///`$1`, `$2`, and so on.
    Numbered,
}

impl<'a> Token<'a> {
    fn parse(token: &'a str) -> Token<'a> {
        match token.strip_prefix('$') {
            Some("*") => Sequence,
            Some("@") => Numbered,
            Some(name) => match name.strip_suffix('!') {
                Some(name) => Variable { name: name, required: true },
                None => Variable { name: name, required: false },
            },
            None => Static(token),
        }
    }

    ///Check if the token is one of the trailing wildcards.
    pub fn is_wildcard(&self) -> bool {
        match *self {
            Sequence | Numbered => true,
            Static(_) | Variable { .. } => false,
        }
    }
}

///A compiled route pattern.
///
///```text
///pattern = "GET admin//$Action/$ID!"
///method = GET
///tokens = [admin, $Action, $ID!]
///shift point = 1
///```
///
///Tokens are separated by `/` or whitespace. A leading HTTP method name in
///upper case, followed by whitespace, restricts the pattern to that method.
///Any other leading word is an ordinary token. A `//`
///marks how many of the tokens should be shifted after a successful match.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Pattern<'a> {
    ///The required HTTP method, if any.
    pub method: Option<&'a str>,
    ///The tokens to match, in order.
    pub tokens: Vec<Token<'a>>,
    ///The number of tokens in front of a `//` marker.
    pub shift_point: Option<usize>,
}

impl<'a> Pattern<'a> {
    ///Compile a pattern. Every string is a valid pattern.
    pub fn parse(source: &'a str) -> Pattern<'a> {
        let (method, rest) = split_method(source.trim());

        let (before, after) = match rest.find("//") {
            Some(index) => (&rest[..index], Some(&rest[index + 2..])),
            None => (rest, None),
        };

        let mut tokens: Vec<_> = tokenize(before).collect();
        let shift_point = after.map(|after| {
            let shift_point = tokens.len();
            tokens.extend(tokenize(after));
            shift_point
        });

        Pattern {
            method: method,
            tokens: tokens,
            shift_point: shift_point,
        }
    }

    ///Check if the pattern has no tokens. An empty pattern only matches when
    ///the whole path has been consumed.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    ///Check if the pattern would match an empty remainder, meaning that it
    ///contains nothing but optional variables and wildcards.
    pub fn matches_empty(&self) -> bool {
        self.tokens.iter().all(|token| match *token {
            Static(_) => false,
            Variable { required, .. } => !required,
            Sequence | Numbered => true,
        })
    }

    ///The number of tokens that should be shifted off after a match, not
    ///counting a trailing wildcard.
    pub fn shift_count(&self) -> usize {
        let explicit = self.shift_point.unwrap_or_else(|| self.tokens.len());
        match self.tokens.iter().position(Token::is_wildcard) {
            Some(wildcard) => wildcard,
            None => explicit,
        }
    }
}

fn split_method(source: &str) -> (Option<&str>, &str) {
    if let Some(end) = source.find(char::is_whitespace) {
        let word = &source[..end];
        if METHODS.contains(word) {
            return (Some(word), source[end..].trim_start());
        }
    }

    (None, source)
}

fn tokenize(source: &str) -> impl Iterator<Item=Token<'_>> {
    source.split(|c: char| c == '/' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(Token::parse)
}

#[cfg(test)]
mod test {
    use super::Pattern;
    use super::Token::{Numbered, Sequence, Static, Variable};

    #[test]
    fn literals_and_variables() {
        let pattern = Pattern::parse("/admin/$Action/$ID!/");
        assert_eq!(pattern.method, None);
        assert_eq!(pattern.shift_point, None);
        assert_eq!(pattern.tokens, vec![
            Static("admin"),
            Variable { name: "Action", required: false },
            Variable { name: "ID", required: true },
        ]);
        assert_eq!(pattern.shift_count(), 3);
    }

    #[test]
    fn method_prefix() {
        let pattern = Pattern::parse("POST  save/$ID");
        assert_eq!(pattern.method, Some("POST"));
        assert_eq!(pattern.tokens, vec![Static("save"), Variable { name: "ID", required: false }]);

        let pattern = Pattern::parse("admin crm");
        assert_eq!(pattern.method, None);
        assert_eq!(pattern.tokens, vec![Static("admin"), Static("crm")]);

        let pattern = Pattern::parse("GET");
        assert_eq!(pattern.method, None);
        assert_eq!(pattern.tokens, vec![Static("GET")]);

        let pattern = Pattern::parse("CRM add");
        assert_eq!(pattern.method, None);
        assert_eq!(pattern.tokens, vec![Static("CRM"), Static("add")]);

        let pattern = Pattern::parse("get admin");
        assert_eq!(pattern.method, None);
        assert_eq!(pattern.tokens, vec![Static("get"), Static("admin")]);
    }

    #[test]
    fn shift_point() {
        let pattern = Pattern::parse("admin/crm//$Action/$ID");
        assert_eq!(pattern.shift_point, Some(2));
        assert_eq!(pattern.tokens.len(), 4);
        assert_eq!(pattern.shift_count(), 2);
    }

    #[test]
    fn wildcards() {
        let pattern = Pattern::parse("files/$*");
        assert_eq!(pattern.tokens, vec![Static("files"), Sequence]);
        assert_eq!(pattern.shift_count(), 1);

        let pattern = Pattern::parse("a//b/$@");
        assert_eq!(pattern.tokens, vec![Static("a"), Static("b"), Numbered]);
        assert_eq!(pattern.shift_count(), 2);
    }

    #[test]
    fn empty_patterns() {
        assert!(Pattern::parse("").is_empty());
        assert!(Pattern::parse(" / ").is_empty());
        assert!(Pattern::parse("$Action/$ID/$OtherID").matches_empty());
        assert!(Pattern::parse("$*").matches_empty());
        assert!(!Pattern::parse("$Action!").matches_empty());
        assert!(!Pattern::parse("admin").matches_empty());
    }
}
