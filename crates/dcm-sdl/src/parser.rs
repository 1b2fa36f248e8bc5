//! Recursive descent parser for mapping-file SDL.

use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::{tokenize, SpannedToken, Token};
use crate::span::Span;

/// Parser for directive-annotated SDL documents.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    /// Span of the most recently consumed token.
    last_span: Span,
}

impl Parser {
    /// Create a new parser; fails on the first invalid token.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
            last_span: Span::default(),
        })
    }

    /// Parse a complete document.
    pub fn parse_document(&mut self) -> Result<Document, ParseError> {
        let mut definitions = Vec::new();
        while self.peek().is_some() {
            definitions.push(self.parse_definition()?);
        }
        Ok(Document { definitions })
    }

    /// Parse one top-level definition.
    fn parse_definition(&mut self) -> Result<Definition, ParseError> {
        let start = self.current_span();
        let description = self.parse_description();

        let keyword = self.expect_name()?;
        match keyword.as_str() {
            "type" => Ok(Definition::Object(
                self.parse_object_body(description, start)?,
            )),
            "interface" => Ok(Definition::Interface(
                self.parse_object_body(description, start)?,
            )),
            "input" => self.parse_input_object(description, start),
            "enum" => self.parse_enum(description, start),
            "scalar" => {
                let name = self.expect_name()?;
                let directives = self.parse_directives()?;
                Ok(Definition::Scalar(ScalarTypeDefinition {
                    description,
                    name,
                    directives,
                    span: start.merge(self.last_span),
                }))
            }
            "union" => self.parse_union(description, start),
            "directive" => self.parse_directive_definition(description, start),
            "schema" => self.parse_schema_definition(start),
            "extend" => {
                if description.is_some() {
                    return Err(ParseError::new(
                        "extensions cannot have a description",
                        start,
                    ));
                }
                let what = self.expect_name()?;
                if what != "type" {
                    return Err(ParseError::new(
                        format!("unsupported extension `extend {}`", what),
                        self.last_span,
                    )
                    .with_hint("only `extend type` is supported in mapping files"));
                }
                Ok(Definition::ObjectExtension(
                    self.parse_object_body(None, start)?,
                ))
            }
            other => Err(ParseError::new(
                format!("expected a type system definition, found `{}`", other),
                self.last_span,
            )
            .with_hint("mapping files contain `type`, `interface`, `input`, `enum`, `scalar`, `union`, `directive` or `schema` definitions")),
        }
    }

    /// Parse `Name implements A & B @dir { fields }` after the keyword.
    fn parse_object_body(
        &mut self,
        description: Option<String>,
        start: Span,
    ) -> Result<ObjectTypeDefinition, ParseError> {
        let name = self.expect_name()?;

        let mut interfaces = Vec::new();
        if self.check_name("implements") {
            self.advance();
            self.eat(&Token::Amp);
            interfaces.push(self.expect_name()?);
            while self.eat(&Token::Amp) {
                interfaces.push(self.expect_name()?);
            }
        }

        let directives = self.parse_directives()?;

        let mut fields = Vec::new();
        if self.eat(&Token::LBrace) {
            while !self.eat(&Token::RBrace) {
                fields.push(self.parse_field_definition()?);
            }
        }

        Ok(ObjectTypeDefinition {
            description,
            name,
            interfaces,
            directives,
            fields,
            span: start.merge(self.last_span),
        })
    }

    /// Parse `"desc" name(args): Type @dir`.
    fn parse_field_definition(&mut self) -> Result<FieldDefinition, ParseError> {
        let start = self.current_span();
        let description = self.parse_description();
        let name = self.expect_name()?;

        let mut arguments = Vec::new();
        if self.eat(&Token::LParen) {
            while !self.eat(&Token::RParen) {
                arguments.push(self.parse_input_value_definition()?);
            }
        }

        self.expect(Token::Colon).map_err(|e| {
            e.with_hint(format!("field `{}` needs a type, e.g. `{}: String`", name, name))
        })?;
        let ty = self.parse_type()?;
        let directives = self.parse_directives()?;

        Ok(FieldDefinition {
            description,
            name,
            arguments,
            ty,
            directives,
            span: start.merge(self.last_span),
        })
    }

    fn parse_input_value_definition(&mut self) -> Result<InputValueDefinition, ParseError> {
        let start = self.current_span();
        let description = self.parse_description();
        let name = self.expect_name()?;
        self.expect(Token::Colon)?;
        let ty = self.parse_type()?;
        let default_value = if self.eat(&Token::Equals) {
            Some(self.parse_value()?)
        } else {
            None
        };
        let directives = self.parse_directives()?;

        Ok(InputValueDefinition {
            description,
            name,
            ty,
            default_value,
            directives,
            span: start.merge(self.last_span),
        })
    }

    fn parse_input_object(
        &mut self,
        description: Option<String>,
        start: Span,
    ) -> Result<Definition, ParseError> {
        let name = self.expect_name()?;
        let directives = self.parse_directives()?;
        let mut fields = Vec::new();
        if self.eat(&Token::LBrace) {
            while !self.eat(&Token::RBrace) {
                fields.push(self.parse_input_value_definition()?);
            }
        }
        Ok(Definition::Input(InputObjectTypeDefinition {
            description,
            name,
            directives,
            fields,
            span: start.merge(self.last_span),
        }))
    }

    fn parse_enum(
        &mut self,
        description: Option<String>,
        start: Span,
    ) -> Result<Definition, ParseError> {
        let name = self.expect_name()?;
        let directives = self.parse_directives()?;
        let mut values = Vec::new();
        if self.eat(&Token::LBrace) {
            while !self.eat(&Token::RBrace) {
                let value_start = self.current_span();
                let value_description = self.parse_description();
                let value_name = self.expect_name()?;
                if matches!(value_name.as_str(), "true" | "false" | "null") {
                    return Err(ParseError::new(
                        format!("`{}` cannot be used as an enum value", value_name),
                        self.last_span,
                    ));
                }
                let value_directives = self.parse_directives()?;
                values.push(EnumValueDefinition {
                    description: value_description,
                    name: value_name,
                    directives: value_directives,
                    span: value_start.merge(self.last_span),
                });
            }
        }
        Ok(Definition::Enum(EnumTypeDefinition {
            description,
            name,
            directives,
            values,
            span: start.merge(self.last_span),
        }))
    }

    fn parse_union(
        &mut self,
        description: Option<String>,
        start: Span,
    ) -> Result<Definition, ParseError> {
        let name = self.expect_name()?;
        let directives = self.parse_directives()?;
        let mut members = Vec::new();
        if self.eat(&Token::Equals) {
            self.eat(&Token::Pipe);
            members.push(self.expect_name()?);
            while self.eat(&Token::Pipe) {
                members.push(self.expect_name()?);
            }
        }
        Ok(Definition::Union(UnionTypeDefinition {
            description,
            name,
            directives,
            members,
            span: start.merge(self.last_span),
        }))
    }

    fn parse_directive_definition(
        &mut self,
        description: Option<String>,
        start: Span,
    ) -> Result<Definition, ParseError> {
        self.expect(Token::At)?;
        let name = self.expect_name()?;

        let mut arguments = Vec::new();
        if self.eat(&Token::LParen) {
            while !self.eat(&Token::RParen) {
                arguments.push(self.parse_input_value_definition()?);
            }
        }

        let repeatable = if self.check_name("repeatable") {
            self.advance();
            true
        } else {
            false
        };

        if !self.check_name("on") {
            return Err(self.unexpected("`on`").with_hint(format!(
                "directive definitions list their locations, e.g. `directive @{} on OBJECT`",
                name
            )));
        }
        self.advance();

        self.eat(&Token::Pipe);
        let mut locations = vec![self.expect_name()?];
        while self.eat(&Token::Pipe) {
            locations.push(self.expect_name()?);
        }

        Ok(Definition::Directive(DirectiveDefinition {
            description,
            name,
            arguments,
            repeatable,
            locations,
            span: start.merge(self.last_span),
        }))
    }

    fn parse_schema_definition(&mut self, start: Span) -> Result<Definition, ParseError> {
        let directives = self.parse_directives()?;
        self.expect(Token::LBrace)?;
        let mut operations = Vec::new();
        while !self.eat(&Token::RBrace) {
            let operation = self.expect_name()?;
            self.expect(Token::Colon)?;
            let root = self.expect_name()?;
            operations.push((operation, root));
        }
        Ok(Definition::Schema(SchemaDefinition {
            directives,
            operations,
            span: start.merge(self.last_span),
        }))
    }

    /// Parse a type reference.
    fn parse_type(&mut self) -> Result<TypeRef, ParseError> {
        let inner = if self.eat(&Token::LBracket) {
            let item = self.parse_type()?;
            self.expect(Token::RBracket)?;
            TypeRef::List(Box::new(item))
        } else {
            TypeRef::Named(self.expect_name()?)
        };

        if self.eat(&Token::Bang) {
            Ok(TypeRef::NonNull(Box::new(inner)))
        } else {
            Ok(inner)
        }
    }

    /// Parse zero or more directive invocations.
    fn parse_directives(&mut self) -> Result<Directives, ParseError> {
        let mut directives = Vec::new();
        while let Some(tok) = self.peek() {
            if tok.token != Token::At {
                break;
            }
            let start = tok.span;
            self.advance();
            let name = self.expect_name()?;

            let mut arguments = Vec::new();
            if self.eat(&Token::LParen) {
                while !self.eat(&Token::RParen) {
                    let arg_start = self.current_span();
                    let arg_name = self.expect_name()?;
                    self.expect(Token::Colon).map_err(|e| {
                        e.with_hint(format!(
                            "directive arguments are named, e.g. `@{}({}: ...)`",
                            name, arg_name
                        ))
                    })?;
                    let value = self.parse_value()?;
                    arguments.push(Argument {
                        name: arg_name,
                        value,
                        span: arg_start.merge(self.last_span),
                    });
                }
            }

            directives.push(Directive {
                name,
                arguments,
                span: start.merge(self.last_span),
            });
        }
        Ok(Directives(directives))
    }

    /// Parse a constant value.
    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let tok = self.next_token()?;
        match tok.token {
            Token::Int(v) => Ok(Value::Int(v)),
            Token::Float(v) => Ok(Value::Float(v)),
            Token::String(s) | Token::BlockString(s) => Ok(Value::String(s)),
            Token::Name(name) => Ok(match name.as_str() {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                "null" => Value::Null,
                _ => Value::Enum(name),
            }),
            Token::LBracket => {
                let mut items = Vec::new();
                while !self.eat(&Token::RBracket) {
                    items.push(self.parse_value()?);
                }
                Ok(Value::List(items))
            }
            Token::LBrace => {
                let mut fields = Vec::new();
                while !self.eat(&Token::RBrace) {
                    let key = self.expect_name()?;
                    self.expect(Token::Colon)?;
                    fields.push((key, self.parse_value()?));
                }
                Ok(Value::Object(fields))
            }
            Token::Dollar => Err(ParseError::new(
                "variables are not allowed in mapping files",
                tok.span,
            )
            .with_hint("directive arguments must be constant values")),
            other => Err(ParseError::new(
                format!("expected a value, found {}", other.describe()),
                tok.span,
            )),
        }
    }

    /// Parse an optional description string.
    fn parse_description(&mut self) -> Option<String> {
        match self.peek().map(|t| &t.token) {
            Some(Token::String(s)) | Some(Token::BlockString(s)) => {
                let description = s.clone();
                self.advance();
                Some(description)
            }
            _ => None,
        }
    }

    // Helper methods

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        if let Some(tok) = self.tokens.get(self.pos) {
            self.last_span = tok.span;
            self.pos += 1;
        }
    }

    fn next_token(&mut self) -> Result<SpannedToken, ParseError> {
        let tok = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::new("unexpected end of input", self.last_span.end_point()))?;
        self.advance();
        Ok(tok)
    }

    /// Span of the next token, or the end of input.
    fn current_span(&self) -> Span {
        self.peek()
            .map(|t| t.span)
            .unwrap_or_else(|| self.last_span.end_point())
    }

    /// Consume the next token if it matches.
    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek().is_some_and(|t| &t.token == expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check_name(&self, keyword: &str) -> bool {
        matches!(self.peek().map(|t| &t.token), Some(Token::Name(n)) if n == keyword)
    }

    fn expect(&mut self, expected: Token) -> Result<SpannedToken, ParseError> {
        match self.peek() {
            Some(tok) if tok.token == expected => self.next_token(),
            _ => Err(self.unexpected(&format!("'{}'", expected))),
        }
    }

    fn expect_name(&mut self) -> Result<String, ParseError> {
        match self.peek().map(|t| &t.token) {
            Some(Token::Name(_)) => match self.next_token()?.token {
                Token::Name(name) => Ok(name),
                _ => unreachable!(),
            },
            _ => Err(self.unexpected("a name")),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(tok) => ParseError::new(
                format!("expected {}, found {}", expected, tok.token.describe()),
                tok.span,
            ),
            None => ParseError::new(
                format!("expected {}, found end of input", expected),
                self.last_span.end_point(),
            ),
        }
    }
}

/// Parse a source string into a document.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    Parser::new(source)?.parse_document()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_entity_type() {
        let doc = parse(
            r#"
            type User @Class(name: "App\\Entity\\User") @Entity @Table(name: "users") {
                id: Int! @Column(type: "integer") @Id @GeneratedValue(strategy: "AUTO")
                email: String @Column(type: "string", length: 180, unique: true)
            }
            "#,
        )
        .unwrap();

        let user = doc.object_type("User").unwrap();
        assert_eq!(user.directives.len(), 3);
        assert_eq!(
            user.directive("Class").and_then(|d| d.argument("name")),
            Some(&Value::String("App\\Entity\\User".to_string()))
        );
        assert_eq!(user.fields().len(), 2);

        let id = user.field("id").unwrap();
        assert_eq!(id.ty.to_string(), "Int!");
        assert!(id.directive("Id").is_some());
        assert!(id.directive("Version").is_none());

        let email = user.field("email").unwrap();
        let column = email.directive("Column").unwrap();
        assert_eq!(column.argument("length"), Some(&Value::Int(180)));
        assert_eq!(column.argument("unique"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn test_parse_values() {
        let doc = parse(
            r#"type T @D(a: null, b: [1 2.5 "x"], c: {k: EAGER, nested: {x: false}}) { f: X }"#,
        )
        .unwrap();
        let d = doc.object_type("T").unwrap().directive("D").unwrap();

        assert_eq!(d.argument("a"), Some(&Value::Null));
        assert_eq!(
            d.argument("b"),
            Some(&Value::List(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::String("x".to_string()),
            ]))
        );
        let c = d.argument("c").unwrap();
        assert_eq!(c.field("k"), Some(&Value::Enum("EAGER".to_string())));
        assert_eq!(
            c.field("nested").and_then(|n| n.field("x")),
            Some(&Value::Boolean(false))
        );
    }

    #[test]
    fn test_parse_descriptions_and_arguments() {
        let doc = parse(
            r#"
            """
            A blog post.
            """
            type Post @Entity {
                "Comments, newest first"
                comments(first: Int = 10): [Comment!]! @OneToMany(targetEntity: "Comment", mappedBy: "post")
            }
            "#,
        )
        .unwrap();

        let post = doc.object_type("Post").unwrap();
        assert_eq!(post.description.as_deref(), Some("A blog post."));
        let comments = post.field("comments").unwrap();
        assert_eq!(comments.description.as_deref(), Some("Comments, newest first"));
        assert_eq!(comments.arguments[0].default_value, Some(Value::Int(10)));
        assert_eq!(comments.ty.base_name(), "Comment");
    }

    #[test]
    fn test_parse_other_definitions() {
        let doc = parse(
            r#"
            schema { query: Query }
            scalar DateTime
            enum Status { ACTIVE INACTIVE @deprecated }
            union Media = | Image | Video
            input Filter { status: Status = ACTIVE }
            interface Node { id: ID! }
            directive @Entity(repositoryClass: String, readOnly: Boolean) on OBJECT
            directive @Join(column: String) repeatable on | FIELD_DEFINITION | OBJECT
            type Image implements Node & Media @Embeddable { id: ID! }
            extend type Image { url: String }
            "#,
        )
        .unwrap();

        assert_eq!(doc.definitions.len(), 10);
        assert!(matches!(&doc.definitions[2], Definition::Enum(e) if e.values.len() == 2));
        assert!(matches!(&doc.definitions[3], Definition::Union(u) if u.members == ["Image", "Video"]));
        assert!(matches!(
            &doc.definitions[7],
            Definition::Directive(d) if d.repeatable && d.locations == ["FIELD_DEFINITION", "OBJECT"]
        ));

        let objects: Vec<_> = doc.object_types().map(|o| o.name.as_str()).collect();
        assert_eq!(objects, vec!["Image", "Image"]);
        assert_eq!(
            doc.object_type("Image").unwrap().interfaces,
            vec!["Node".to_string(), "Media".to_string()]
        );
    }

    #[test]
    fn test_error_missing_colon() {
        let err = parse("type User { id Int }").unwrap_err();
        assert!(err.message.contains("expected ':'"));
        assert!(err.hint.unwrap().contains("field `id` needs a type"));
    }

    #[test]
    fn test_error_variable_in_directive() {
        let err = parse("type User @Table(name: $name) { id: Int }").unwrap_err();
        assert!(err.message.contains("variables are not allowed"));
        assert_eq!(err.span, Span::new(23, 24));
    }

    #[test]
    fn test_error_unexpected_end() {
        let err = parse("type User @Entity {").unwrap_err();
        assert!(err.message.contains("end of input"));
    }

    #[test]
    fn test_error_unknown_definition() {
        let err = parse("query { users }").unwrap_err();
        assert!(err.message.contains("expected a type system definition"));
    }

    #[test]
    fn test_error_unsupported_extension() {
        let err = parse("extend enum Status { DONE }").unwrap_err();
        assert!(err.message.contains("unsupported extension"));
    }
}
