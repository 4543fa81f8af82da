/// Placeholder a result template can reference as `#{name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Title,
    Href,
    /// The first snippet of the result.
    Snippet,
    Count,
    /// Any other alphabetic name, looked up in the page's `<meta>` tags.
    Meta(String),
}

impl Token {
    fn from_name(name: &str) -> Self {
        match name {
            "title" => Token::Title,
            "href" => Token::Href,
            "token" => Token::Snippet,
            "count" => Token::Count,
            other => Token::Meta(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Token(Token),
}

/// Values a template token resolves to for one result.
pub trait TokenSource {
    fn title(&self) -> &str;
    fn href(&self) -> &str;
    fn first_snippet(&self) -> &str;
    fn count(&self) -> usize;
    fn meta(&self, name: &str) -> Option<&str>;
}

/// A result template split once into literal text and `#{name}` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTemplate {
    segments: Vec<Segment>,
}

impl ResultTemplate {
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(open) = rest.find("#{") {
            let after = &rest[open + 2..];
            let name_len = after
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(after.len());

            if after[name_len..].starts_with('}') {
                literal.push_str(&rest[..open]);
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Token(Token::from_name(&after[..name_len])));
                rest = &after[name_len + 1..];
            } else {
                // Not a token, keep "#{" as text and scan on.
                literal.push_str(&rest[..open + 2]);
                rest = after;
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Names of the meta tokens, deduplicated, in first-use order.
    pub fn meta_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Token(Token::Meta(name)) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn render<S: TokenSource + ?Sized>(&self, source: &S) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Token(Token::Title) => out.push_str(source.title()),
                Segment::Token(Token::Href) => out.push_str(source.href()),
                Segment::Token(Token::Snippet) => out.push_str(source.first_snippet()),
                Segment::Token(Token::Count) => out.push_str(&source.count().to_string()),
                Segment::Token(Token::Meta(name)) => {
                    out.push_str(source.meta(name).unwrap_or_default())
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fixture {
        meta: HashMap<String, String>,
    }

    impl TokenSource for Fixture {
        fn title(&self) -> &str {
            "Home"
        }
        fn href(&self) -> &str {
            "site/index.html"
        }
        fn first_snippet(&self) -> &str {
            "a <span class=\"search\">hit</span>"
        }
        fn count(&self) -> usize {
            3
        }
        fn meta(&self, name: &str) -> Option<&str> {
            self.meta.get(name).map(String::as_str)
        }
    }

    fn fixture() -> Fixture {
        Fixture {
            meta: HashMap::from([("author".to_string(), "Ada".to_string())]),
        }
    }

    #[test]
    fn renders_builtin_tokens() {
        let template = ResultTemplate::parse("<a href='#{href}'>#{title}</a> #{token} (#{count}) #{href}");
        assert_eq!(
            template.render(&fixture()),
            "<a href='site/index.html'>Home</a> a <span class=\"search\">hit</span> (3) site/index.html"
        );
    }

    #[test]
    fn meta_tokens_resolve_or_vanish() {
        let template = ResultTemplate::parse("#{author}|#{keywords}|#{author}");
        assert_eq!(template.meta_names(), vec!["author", "keywords"]);
        assert_eq!(template.render(&fixture()), "Ada||Ada");
    }

    #[test]
    fn non_alphabetic_braces_stay_literal() {
        let template = ResultTemplate::parse("#{foo-bar} #{ title} #{title");
        assert!(template.meta_names().is_empty());
        assert_eq!(template.render(&fixture()), "#{foo-bar} #{ title} #{title");
    }

    #[test]
    fn builtin_names_are_exact() {
        let template = ResultTemplate::parse("#{Title}");
        assert_eq!(template.meta_names(), vec!["Title"]);
        assert_eq!(template.render(&fixture()), "");
    }
}
