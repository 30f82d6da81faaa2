//! Parser for declaration sources
//!
//! Converts a token stream into a [`Program`]. Only the declaration level is parsed: the
//! parser reads headers and member signatures, and skips every body token-wise (a block is a
//! balanced INDENT/DEDENT run, an inline body runs to the end of the line).

use suitegen_core::lang::conventions::CONSTRUCTOR_NAME;
use suitegen_core::lang::keywords::KeywordId;

use crate::ast::*;
use crate::diagnostics::CompileError;
use crate::lexer::{Token, TokenKind};

/// A member of a class body.
enum Member {
    Field(Spanned<FieldDecl>),
    Method(Spanned<MethodDecl>),
    /// `pass`, `...` or a docstring
    Nothing,
}

/// Parser state. The token slice always ends with `Eof`.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<CompileError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the entire token stream into a program
    fn parse(mut self) -> Result<Program, Vec<CompileError>> {
        let mut declarations: Vec<Spanned<Declaration>> = Vec::new();

        self.skip_newlines();
        self.skip_dedents();

        while !self.is_at_end() {
            // Module docstrings
            if matches!(self.peek().kind, TokenKind::String(_)) {
                self.skip_line();
                self.skip_newlines();
                continue;
            }

            match self.declaration() {
                Ok(decl) => {
                    if matches!(decl.node, Declaration::Package(_)) && !declarations.is_empty() {
                        self.errors.push(
                            CompileError::syntax("package declaration must come first", decl.span)
                                .with_hint("Move the 'package' line to the top of the file"),
                        );
                    }
                    declarations.push(decl);
                }
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
            self.skip_newlines();
            self.skip_dedents();
        }

        if self.errors.is_empty() {
            Ok(Program { declarations })
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, msg: &str) -> Result<&Token, CompileError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, msg: &str) -> Result<(), CompileError> {
        if self.match_keyword(id) {
            Ok(())
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn unexpected(&self, msg: &str) -> CompileError {
        CompileError::syntax(format!("{}, found {:?}", msg, self.peek().kind), self.peek().span)
    }

    fn identifier(&mut self, what: &str) -> Result<Ident, CompileError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(&format!("Expected {what}"))),
        }
    }

    fn skip_newlines(&mut self) {
        while self.match_token(&TokenKind::Newline) {}
    }

    /// Skip stray DEDENT tokens at the current position.
    ///
    /// These should not normally appear at module level, but can show up after error recovery.
    fn skip_dedents(&mut self) {
        while self.match_token(&TokenKind::Dedent) {}
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    /// Block nesting at the current position.
    fn block_depth(&self) -> usize {
        self.tokens[..self.pos].iter().fold(0usize, |depth, t| match t.kind {
            TokenKind::Indent => depth + 1,
            TokenKind::Dedent => depth.saturating_sub(1),
            _ => depth,
        })
    }

    /// Skip to the end of the current top-level declaration.
    fn synchronize(&mut self) {
        let mut depth = self.block_depth();
        while !self.is_at_end() {
            let kind = self.advance().kind.clone();
            match kind {
                TokenKind::Indent => depth += 1,
                TokenKind::Dedent => depth = depth.saturating_sub(1),
                _ => {}
            }
            if depth == 0
                && matches!(kind, TokenKind::Newline | TokenKind::Dedent)
                && !self.check(&TokenKind::Indent)
            {
                return;
            }
        }
    }

    // ========================================================================
    // Bodies
    // ========================================================================

    /// Skip tokens up to and including the next NEWLINE.
    fn skip_line(&mut self) {
        while !self.is_at_end() {
            if matches!(self.advance().kind, TokenKind::Newline) {
                return;
            }
        }
    }

    /// Skip an indented block whose INDENT has already been consumed.
    fn skip_block(&mut self) {
        let mut depth = 1usize;
        while !self.is_at_end() {
            match self.advance().kind {
                TokenKind::Indent => depth += 1,
                TokenKind::Dedent => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    /// Skip the body that follows a `:`.
    fn skip_body(&mut self) -> Result<(), CompileError> {
        if self.match_token(&TokenKind::Newline) {
            self.expect(&TokenKind::Indent, "Expected indented block")?;
            self.skip_block();
        } else {
            self.skip_line();
        }
        Ok(())
    }

    /// Finish a declaration header: either a skipped `: body` or the end of the line.
    ///
    /// Returns whether a body was present.
    fn header_end(&mut self, what: &str) -> Result<bool, CompileError> {
        if self.match_token(&TokenKind::Colon) {
            self.skip_body()?;
            Ok(true)
        } else {
            self.end_of_line(what)?;
            Ok(false)
        }
    }

    fn end_of_line(&mut self, what: &str) -> Result<(), CompileError> {
        if self.match_token(&TokenKind::Newline) || self.is_at_end() {
            Ok(())
        } else {
            Err(self.unexpected(&format!("Expected newline after {what}")))
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn declaration(&mut self) -> Result<Spanned<Declaration>, CompileError> {
        let start = self.current_span().start;

        let decl = if self.match_keyword(KeywordId::Package) {
            let name = self.qualified_name("package name")?;
            self.end_of_line("package declaration")?;
            Declaration::Package(name)
        } else if self.check_keyword(KeywordId::Import) {
            Declaration::Import(self.import_decl()?)
        } else {
            let visibility = self.visibility();
            let is_abstract = self.match_keyword(KeywordId::Abstract);

            if self.check_keyword(KeywordId::Class) {
                Declaration::Class(self.class_decl(visibility, is_abstract)?)
            } else if is_abstract {
                return Err(CompileError::syntax("'abstract' is only valid on classes", self.previous_span())
                    .with_hint("Traits are always abstract"));
            } else if self.check_keyword(KeywordId::Trait) {
                Declaration::Trait(self.trait_decl(visibility)?)
            } else if self.check_keyword(KeywordId::Def) {
                Declaration::Function(self.function_decl(visibility)?)
            } else {
                return Err(self.unexpected("Expected declaration"));
            }
        };

        let end = self.previous_span().end;
        Ok(Spanned::new(decl, Span::new(start, end)))
    }

    fn visibility(&mut self) -> Visibility {
        if self.match_keyword(KeywordId::Pub) {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }

    fn qualified_name(&mut self, what: &str) -> Result<QualifiedName, CompileError> {
        let mut segments = vec![self.identifier(what)?];
        while self.check(&TokenKind::Dot) && matches!(self.peek_after().kind, TokenKind::Ident(_)) {
            self.advance();
            segments.push(self.identifier(what)?);
        }
        Ok(QualifiedName { segments })
    }

    fn peek_after(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    /// `import a.b.C`, `import a.b.C as D`, `import a.b.*`
    fn import_decl(&mut self) -> Result<ImportDecl, CompileError> {
        self.expect_keyword(KeywordId::Import, "Expected 'import'")?;
        let path = self.qualified_name("import path")?;

        let wildcard = if self.match_token(&TokenKind::Dot) {
            self.expect(&TokenKind::Star, "Expected name or '*' after '.'")?;
            true
        } else {
            false
        };

        let alias = if self.match_keyword(KeywordId::As) {
            if wildcard {
                return Err(CompileError::syntax(
                    "a wildcard import cannot have an alias",
                    self.previous_span(),
                ));
            }
            Some(self.identifier("alias name")?)
        } else {
            None
        };

        self.end_of_line("import")?;
        Ok(ImportDecl { path, wildcard, alias })
    }

    fn class_decl(&mut self, visibility: Visibility, is_abstract: bool) -> Result<ClassDecl, CompileError> {
        self.expect_keyword(KeywordId::Class, "Expected 'class'")?;
        let name = self.identifier("class name")?;
        let type_params = self.type_params()?;

        let extends = if self.match_keyword(KeywordId::Extends) {
            Some(self.type_ref()?)
        } else {
            None
        };
        let traits = if self.match_keyword(KeywordId::With) {
            self.type_ref_list()?
        } else {
            Vec::new()
        };

        let mut fields = Vec::new();
        let mut methods = Vec::new();

        if !self.match_token(&TokenKind::Colon) {
            self.end_of_line("class header")?;
        } else if !self.match_token(&TokenKind::Newline) {
            // `class A: pass`
            self.skip_line();
        } else {
            self.expect(&TokenKind::Indent, "Expected indented class body")?;
            self.skip_newlines();
            while !self.check(&TokenKind::Dedent) && !self.is_at_end() {
                match self.class_member()? {
                    Member::Field(field) => fields.push(field),
                    Member::Method(method) => methods.push(method),
                    Member::Nothing => {}
                }
                self.skip_newlines();
            }
            self.match_token(&TokenKind::Dedent);
        }

        Ok(ClassDecl {
            visibility,
            is_abstract,
            name,
            type_params,
            extends,
            traits,
            fields,
            methods,
        })
    }

    fn class_member(&mut self) -> Result<Member, CompileError> {
        if self.match_keyword(KeywordId::Pass) || self.match_token(&TokenKind::Ellipsis) {
            self.end_of_line("'pass'")?;
            return Ok(Member::Nothing);
        }
        if matches!(self.peek().kind, TokenKind::String(_)) {
            self.skip_line();
            return Ok(Member::Nothing);
        }

        let start = self.current_span().start;
        let visibility = self.visibility();

        if self.check_keyword(KeywordId::Def) {
            return Ok(Member::Method(self.method_decl(visibility)?));
        }

        let name = self.identifier("field or method")?;
        self.expect(&TokenKind::Colon, "Expected ':' after field name")?;
        let ty = self.type_ref()?;
        // Initializers are not kept
        if self.match_token(&TokenKind::Eq) {
            self.skip_line();
        } else {
            self.end_of_line("field")?;
        }
        let end = ty.span.end;
        Ok(Member::Field(Spanned::new(
            FieldDecl { visibility, name, ty },
            Span::new(start, end),
        )))
    }

    fn trait_decl(&mut self, visibility: Visibility) -> Result<TraitDecl, CompileError> {
        self.expect_keyword(KeywordId::Trait, "Expected 'trait'")?;
        let name = self.identifier("trait name")?;
        let type_params = self.type_params()?;
        let traits = if self.match_keyword(KeywordId::With) {
            self.type_ref_list()?
        } else {
            Vec::new()
        };

        let mut methods = Vec::new();
        if !self.match_token(&TokenKind::Colon) {
            self.end_of_line("trait header")?;
        } else if !self.match_token(&TokenKind::Newline) {
            self.skip_line();
        } else {
            self.expect(&TokenKind::Indent, "Expected indented trait body")?;
            self.skip_newlines();
            while !self.check(&TokenKind::Dedent) && !self.is_at_end() {
                match self.class_member()? {
                    Member::Method(method) => methods.push(method),
                    Member::Field(field) => {
                        return Err(CompileError::syntax("traits cannot declare fields", field.span));
                    }
                    Member::Nothing => {}
                }
                self.skip_newlines();
            }
            self.match_token(&TokenKind::Dedent);
        }

        Ok(TraitDecl {
            visibility,
            name,
            type_params,
            traits,
            methods,
        })
    }

    fn function_decl(&mut self, visibility: Visibility) -> Result<FunctionDecl, CompileError> {
        self.expect_keyword(KeywordId::Def, "Expected 'def'")?;
        let name = self.identifier("function name")?;
        let (has_receiver, params) = self.params()?;
        if has_receiver {
            return Err(CompileError::syntax(
                format!("function '{name}' cannot take 'self'"),
                self.previous_span(),
            )
            .with_hint("Only methods declared inside a class or trait have a receiver"));
        }
        let return_type = self.return_type()?;
        self.header_end("function signature")?;

        Ok(FunctionDecl {
            visibility,
            name,
            params,
            return_type,
        })
    }

    fn method_decl(&mut self, visibility: Visibility) -> Result<Spanned<MethodDecl>, CompileError> {
        let start = self.current_span().start;
        self.expect_keyword(KeywordId::Def, "Expected 'def'")?;
        let name = self.identifier("method name")?;
        let (has_receiver, params) = self.params()?;
        if name == CONSTRUCTOR_NAME && !has_receiver {
            return Err(CompileError::syntax(
                format!("'{CONSTRUCTOR_NAME}' must take 'self' as its first parameter"),
                Span::new(start, self.previous_span().end),
            ));
        }
        let return_type = self.return_type()?;
        let end = self.previous_span().end;
        let has_body = self.header_end("method signature")?;

        Ok(Spanned::new(
            MethodDecl {
                visibility,
                name,
                has_receiver,
                params,
                return_type,
                has_body,
            },
            Span::new(start, end),
        ))
    }

    fn return_type(&mut self) -> Result<Option<Spanned<TypeRef>>, CompileError> {
        if self.match_token(&TokenKind::Arrow) {
            Ok(Some(self.type_ref()?))
        } else {
            Ok(None)
        }
    }

    /// `(self, a: int, mut b)`; returns whether a receiver was present.
    fn params(&mut self) -> Result<(bool, Vec<Spanned<Param>>), CompileError> {
        self.expect(&TokenKind::LParen, "Expected '('")?;
        let mut has_receiver = false;
        let mut params = Vec::new();

        if self.match_keyword(KeywordId::SelfKw) {
            has_receiver = true;
            if !self.check(&TokenKind::RParen) {
                self.expect(&TokenKind::Comma, "Expected ',' or ')' after 'self'")?;
            }
        }

        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            params.push(self.param()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RParen, "Expected ')' after parameters")?;
        Ok((has_receiver, params))
    }

    fn param(&mut self) -> Result<Spanned<Param>, CompileError> {
        let start = self.current_span().start;
        if self.check_keyword(KeywordId::SelfKw) {
            return Err(CompileError::syntax(
                "'self' is only valid as the first parameter",
                self.current_span(),
            ));
        }
        let is_mut = self.match_keyword(KeywordId::Mut);
        let name = self.identifier("parameter name")?;
        let ty = if self.match_token(&TokenKind::Colon) {
            Some(self.type_ref()?)
        } else {
            None
        };
        if self.check(&TokenKind::Eq) {
            return Err(CompileError::syntax(
                format!("default value for parameter '{name}' is not supported"),
                self.current_span(),
            ));
        }
        let end = self.previous_span().end;
        Ok(Spanned::new(Param { is_mut, name, ty }, Span::new(start, end)))
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn type_params(&mut self) -> Result<Vec<Ident>, CompileError> {
        let mut params = Vec::new();
        if self.match_token(&TokenKind::LBracket) {
            loop {
                params.push(self.identifier("type parameter")?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RBracket, "Expected ']' after type parameters")?;
        }
        Ok(params)
    }

    /// `a.b.Name[Arg, ...]`
    fn type_ref(&mut self) -> Result<Spanned<TypeRef>, CompileError> {
        let start = self.current_span().start;
        let name = self.qualified_name("type name")?;
        let mut args = Vec::new();
        if self.match_token(&TokenKind::LBracket) {
            args = self.type_ref_list()?;
            self.expect(&TokenKind::RBracket, "Expected ']' after type arguments")?;
        }
        let end = self.previous_span().end;
        Ok(Spanned::new(TypeRef { name, args }, Span::new(start, end)))
    }

    fn type_ref_list(&mut self) -> Result<Vec<Spanned<TypeRef>>, CompileError> {
        let mut refs = vec![self.type_ref()?];
        while self.match_token(&TokenKind::Comma) {
            refs.push(self.type_ref()?);
        }
        Ok(refs)
    }
}

/// Convenience function to parse a token stream
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Program, Vec<CompileError>> {
    match tokens.last() {
        Some(last) if matches!(last.kind, TokenKind::Eof) => Parser::new(tokens).parse(),
        last => {
            // Streams built by hand may lack the terminating `Eof`
            let end = last.map_or(0, |t| t.span.end);
            let mut owned = tokens.to_vec();
            owned.push(Token::new(TokenKind::Eof, Span::new(end, end)));
            Parser::new(&owned).parse()
        }
    }
}
