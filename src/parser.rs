use std::collections::HashSet;
use std::mem;

use thiserror::Error;

use crate::{
    ast::{Assertion, AssertionForm, Assertions, Declaration, FormKind, Literal, Model, Operand, Path, Quantifier, Step, Token},
    diagnostics::{self, Diagnostic},
    lexer::{Lexer, SpannedToken},
    syntax::{AssertionSyntax, Construct, DeclarationSyntax, NodeId, NodeKind, RawSyntaxError, SyntaxTree},
};

/// Every syntax error found in a source, plus the syntax tree they point into.
#[derive(Debug, Clone, Error)]
#[error("{} syntax error(s) found", .errors.len())]
pub struct SyntaxErrors {
    pub errors: Vec<RawSyntaxError>,
    pub tree: SyntaxTree,
}

impl SyntaxErrors {
    /// Renders each error with its line and offending token.
    pub fn describe(&self) -> Vec<Diagnostic> {
        diagnostics::describe(&self.errors, &self.tree)
    }
}

/// Deepest nesting of `not` and parentheses accepted.
pub const MAX_NESTING: usize = 128;

/// Marks an error that has already been recorded; the statement is abandoned.
#[derive(Debug)]
struct Recover;

type Parse<T> = Result<T, Recover>;

pub struct Parser {
    lexer: Lexer,
    current: SpannedToken,
    tree: SyntaxTree,
    scope: Vec<NodeId>,
    errors: Vec<RawSyntaxError>,
    /// Names declared so far; bare identifiers naming one are variable references.
    declared: HashSet<String>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        Parser {
            lexer,
            current,
            tree: SyntaxTree::new(),
            scope: Vec::new(),
            errors: Vec::new(),
            declared: HashSet::new(),
        }
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current.token) == mem::discriminant(token)
    }

    fn line(&self) -> usize {
        self.current.position.line
    }

    fn open(&mut self, kind: NodeKind) -> NodeId {
        let id = self.tree.push(self.scope.last().copied(), kind);
        self.scope.push(id);
        id
    }

    fn close(&mut self, id: NodeId, kind: NodeKind) {
        self.tree.set_kind(id, kind);
        if self.scope.last() == Some(&id) {
            self.scope.pop();
        }
    }

    fn error_at(&mut self, node: NodeId, line: usize, message: impl Into<String>) -> Recover {
        self.errors.push(RawSyntaxError {
            message: message.into(),
            line,
            node,
        });
        Recover
    }

    /// Records an error against the innermost open construct.
    fn error(&mut self, message: impl Into<String>) -> Recover {
        let line = self.line();
        self.error_on_line(line, message)
    }

    fn error_on_line(&mut self, line: usize, message: impl Into<String>) -> Recover {
        match self.scope.last().copied() {
            Some(node) => self.error_at(node, line, message),
            None => {
                let root = self.tree.push(None, NodeKind::Other(Construct::Model));
                self.error_at(root, line, message)
            }
        }
    }

    fn unexpected(&mut self, expected: &str) -> Recover {
        let message = match &self.current.token {
            Token::Invalid(reason) => reason.clone(),
            found => format!("expected {}, found {}", expected, found),
        };
        self.error(message)
    }

    fn expect(&mut self, expected: Token, description: &str) -> Parse<()> {
        if !self.check(&expected) {
            return Err(self.unexpected(description));
        }
        self.advance();
        Ok(())
    }

    /// Skips to the start of the next statement after an error.
    fn synchronize(&mut self) {
        loop {
            match self.current.token {
                Token::Eof | Token::Let => return,
                Token::Semicolon => {
                    self.advance();
                    return;
                }
                _ => self.advance(),
            }
        }
    }
}

impl Parser {
    /// Parse a complete Specl source.
    ///
    /// Parsing continues past errors, so the returned [`SyntaxErrors`] lists
    /// every broken statement, not just the first one.
    pub fn parse_model(mut self) -> Result<Model, SyntaxErrors> {
        let root = self.open(NodeKind::Other(Construct::Model));
        let mut declarations = vec![];
        let mut statements = vec![];

        while !self.check(&Token::Eof) {
            match self.current.token {
                Token::Let => {
                    let after_assertions = !statements.is_empty();
                    match self.parse_declaration(after_assertions) {
                        Ok(declaration) => declarations.push(declaration),
                        Err(Recover) => self.synchronize(),
                    }
                }
                Token::Semicolon => self.advance(),
                _ => match self.parse_statement() {
                    Ok(assertions) => statements.push(assertions),
                    Err(Recover) => self.synchronize(),
                },
            }
        }

        if statements.is_empty() && self.errors.is_empty() {
            let _ = self.error("expected at least one assertion");
        }
        self.close(root, NodeKind::Other(Construct::Model));

        if !self.errors.is_empty() {
            return Err(SyntaxErrors {
                errors: self.errors,
                tree: self.tree,
            });
        }

        let assertion_set = if statements.len() == 1 {
            statements.remove(0)
        } else {
            Assertions::And(statements)
        };

        Ok(Model {
            declarations,
            assertion_set,
        })
    }

    fn parse_declaration(&mut self, after_assertions: bool) -> Parse<Declaration> {
        let line = self.line();
        let id = self.open(NodeKind::Declaration(DeclarationSyntax::default()));
        let mut draft = DeclarationSyntax::default();
        let result = self.declaration_body(&mut draft);
        draft.complete = result.is_ok();
        self.close(id, NodeKind::Declaration(draft));

        let declaration = result?;
        if after_assertions {
            // Already past the ';', so no resynchronisation is needed.
            let _ = self.error_at(id, line, "declarations must precede assertions");
        }
        Ok(declaration)
    }

    fn declaration_body(&mut self, draft: &mut DeclarationSyntax) -> Parse<Declaration> {
        self.advance(); // consume 'let'

        let name = match &self.current.token {
            Token::Identifier(name) => name.clone(),
            _ => return Err(self.unexpected("a variable name after 'let'")),
        };
        self.advance();
        draft.name = Some(name.clone());

        self.expect(Token::Equals, "'=' after variable name")?;
        self.parse_path(&mut draft.path)?;
        self.expect(Token::Semicolon, "';' after declaration")?;

        self.declared.insert(name.clone());
        Ok(Declaration {
            name,
            path: draft.path.clone(),
        })
    }

    /// Parse a path from its head: `$`, a field name, `*` or a bracket step.
    fn parse_path(&mut self, steps: &mut Path) -> Parse<()> {
        match &self.current.token {
            Token::Dollar => self.advance(),
            Token::Identifier(name) => {
                steps.push(Step::Field(name.clone()));
                self.advance();
            }
            Token::Star => {
                steps.push(Step::Wildcard);
                self.advance();
            }
            Token::LBracket => self.parse_bracket_step(steps)?,
            _ => return Err(self.unexpected("a path")),
        }
        self.parse_steps(steps)
    }

    /// Parse trailing `.name`, `.*` and `[key]` steps.
    fn parse_steps(&mut self, steps: &mut Path) -> Parse<()> {
        loop {
            if self.check(&Token::Dot) {
                self.advance(); // consume '.'

                let step = match &self.current.token {
                    Token::Identifier(name) => Step::Field(name.clone()),
                    Token::Star => Step::Wildcard,
                    _ => return Err(self.unexpected("a field name or '*' after '.'")),
                };
                self.advance();
                steps.push(step);
            } else if self.check(&Token::LBracket) {
                self.parse_bracket_step(steps)?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_bracket_step(&mut self, steps: &mut Path) -> Parse<()> {
        self.advance(); // consume '['

        let step = match &self.current.token {
            Token::Integer(n) => {
                let n = *n;
                match usize::try_from(n) {
                    Ok(index) => Step::Index(index),
                    Err(_) => return Err(self.error(format!("index must be non-negative, found {}", n))),
                }
            }
            Token::String(key) => Step::Field(key.clone()),
            Token::Star => Step::Wildcard,
            _ => return Err(self.unexpected("an index, a quoted key or '*' inside '[]'")),
        };
        self.advance();

        let id = self.open(NodeKind::Step(step.clone()));
        let closed = self.expect(Token::RBracket, "']'");
        self.close(id, NodeKind::Step(step.clone()));
        closed?;

        steps.push(step);
        Ok(())
    }

    fn parse_statement(&mut self) -> Parse<Assertions> {
        let assertions = self.parse_or()?;

        match self.current.token {
            Token::Semicolon => self.advance(),
            Token::Eof => {}
            _ => return Err(self.unexpected("'and', 'or', ';' or end of input")),
        }
        Ok(assertions)
    }

    fn parse_or(&mut self) -> Parse<Assertions> {
        let mut children = vec![self.parse_and()?];

        while self.check(&Token::Or) {
            self.advance();
            children.push(self.parse_and()?);
        }

        if children.len() == 1 {
            Ok(children.remove(0))
        } else {
            Ok(Assertions::Or(children))
        }
    }

    fn parse_and(&mut self) -> Parse<Assertions> {
        let mut children = vec![self.parse_not()?];

        while self.check(&Token::And) {
            self.advance();
            children.push(self.parse_not()?);
        }

        if children.len() == 1 {
            Ok(children.remove(0))
        } else {
            Ok(Assertions::And(children))
        }
    }

    fn parse_not(&mut self) -> Parse<Assertions> {
        if matches!(self.current.token, Token::Not | Token::LParen) && self.scope.len() > MAX_NESTING {
            return Err(self.error(format!("assertions nested deeper than {} levels", MAX_NESTING)));
        }
        match self.current.token {
            Token::Not => {
                let id = self.open(NodeKind::Other(Construct::Negation));
                self.advance();
                let inner = self.parse_not();
                self.close(id, NodeKind::Other(Construct::Negation));
                Ok(Assertions::Not(Box::new(inner?)))
            }
            Token::LParen => {
                let id = self.open(NodeKind::Other(Construct::Group));
                self.advance();
                let inner = self.parse_or();
                let closed = match &inner {
                    Ok(_) => self.expect(Token::RParen, "')'"),
                    Err(_) => Err(Recover),
                };
                self.close(id, NodeKind::Other(Construct::Group));
                closed?;
                inner
            }
            Token::All | Token::Any | Token::Identifier(_) => {
                Ok(Assertions::Single(self.parse_assertion()?))
            }
            _ => Err(self.unexpected("an assertion")),
        }
    }

    fn parse_assertion(&mut self) -> Parse<Assertion> {
        let id = self.open(NodeKind::Assertion(AssertionSyntax::default()));
        let mut draft = AssertionSyntax::default();
        let result = self.assertion_body(&mut draft);
        draft.complete = result.is_ok();
        self.close(id, NodeKind::Assertion(draft));
        result
    }

    fn assertion_body(&mut self, draft: &mut AssertionSyntax) -> Parse<Assertion> {
        let quantifier = match self.current.token {
            Token::All => Some(Quantifier::All),
            Token::Any => Some(Quantifier::Any),
            _ => None,
        };
        if quantifier.is_some() {
            self.advance();
        }
        draft.quantifier = quantifier;

        let line = self.line();
        let name = match &self.current.token {
            Token::Identifier(name) => name.clone(),
            _ => return Err(self.unexpected("an assertion form")),
        };
        self.advance();
        draft.form = Some(name.clone());

        let Some(kind) = FormKind::from_name(&name) else {
            return Err(self.error_on_line(line, format!("unknown assertion form '{}'", name)));
        };
        if let Some(quantifier) = quantifier
            && kind.counts_nodes()
        {
            return Err(self.error_on_line(
                line,
                format!("'{}' cannot be quantified with '{}'", kind, quantifier),
            ));
        }

        self.expect(Token::LParen, "'(' after assertion form")?;

        let signature = kind.signature();
        let mut operands = Vec::with_capacity(signature.operands);
        for position in 0..signature.operands {
            if position > 0 {
                self.expect_more(kind)?;
            }
            let operand_line = self.line();
            let operand = self.parse_operand()?;
            draft.items.push(operand.to_string());
            if kind.counts_nodes()
                && let Operand::Literal(literal) = &operand
            {
                return Err(self.error_on_line(
                    operand_line,
                    format!("'{}' expects a path or variable, found literal {}", kind, literal),
                ));
            }
            operands.push(operand);
        }

        let form_id = self.open(NodeKind::AssertionForm(AssertionForm::new(kind)));
        let mut form = AssertionForm::new(kind);
        let arguments = self.form_arguments(&mut form);
        draft.items.extend(form.args.iter().map(ToString::to_string));
        self.close(form_id, NodeKind::AssertionForm(form.clone()));
        arguments?;

        if self.check(&Token::Comma) {
            return Err(self.error(format!(
                "too many arguments for '{}': {}",
                kind,
                describe_signature(kind)
            )));
        }
        self.expect(Token::RParen, "')'")?;

        let mut operands = operands.into_iter();
        let (Some(left), right) = (operands.next(), operands.next()) else {
            return Err(self.error(format!("'{}' is missing its operand", kind)));
        };

        Ok(Assertion {
            quantifier,
            form,
            left,
            right,
        })
    }

    /// Consumes the `,` before the next operand or argument, reporting a
    /// short argument list when `)` comes first.
    fn expect_more(&mut self, kind: FormKind) -> Parse<()> {
        match self.current.token {
            Token::Comma => {
                self.advance();
                Ok(())
            }
            Token::RParen => Err(self.error(format!(
                "not enough arguments for '{}': {}",
                kind,
                describe_signature(kind)
            ))),
            _ => Err(self.unexpected("','")),
        }
    }

    fn form_arguments(&mut self, form: &mut AssertionForm) -> Parse<()> {
        for _ in 0..form.kind.signature().literals {
            self.expect_more(form.kind)?;
            let line = self.line();
            let literal = self.parse_literal()?;
            form.args.push(literal);
            if let Some(message) = check_argument(form) {
                return Err(self.error_on_line(line, message));
            }
        }
        Ok(())
    }

    fn parse_operand(&mut self) -> Parse<Operand> {
        let id = self.open(NodeKind::Other(Construct::Operand));
        let result = self.operand_body();
        self.close(id, NodeKind::Other(Construct::Operand));
        result
    }

    fn operand_body(&mut self) -> Parse<Operand> {
        match &self.current.token {
            Token::Integer(_) | Token::Float(_) | Token::String(_) | Token::Boolean(_) | Token::Null => {
                Ok(Operand::Literal(self.parse_literal()?))
            }
            Token::Variable(name) => {
                let name = name.clone();
                self.advance();
                let mut path = vec![];
                self.parse_steps(&mut path)?;
                Ok(Operand::Variable { name, path })
            }
            Token::Identifier(name) if self.declared.contains(name) => {
                let name = name.clone();
                self.advance();
                let mut path = vec![];
                self.parse_steps(&mut path)?;
                Ok(Operand::Variable { name, path })
            }
            Token::Dollar | Token::Identifier(_) | Token::Star | Token::LBracket => {
                let mut path = vec![];
                self.parse_path(&mut path)?;
                Ok(Operand::Path(path))
            }
            _ => Err(self.unexpected("an operand")),
        }
    }

    fn parse_literal(&mut self) -> Parse<Literal> {
        let literal = match mem::replace(&mut self.current.token, Token::Eof) {
            Token::Integer(n) => Literal::Integer(n),
            Token::Float(n) => Literal::Float(n),
            Token::String(s) => Literal::String(s),
            Token::Boolean(b) => Literal::Boolean(b),
            Token::Null => Literal::Null,
            token => {
                self.current.token = token;
                return Err(self.unexpected("a literal"));
            }
        };
        self.advance();
        Ok(literal)
    }
}

/// Validates the most recently pushed literal argument of a form.
fn check_argument(form: &AssertionForm) -> Option<String> {
    let literal = form.args.last()?;
    match (form.kind, literal) {
        (FormKind::Matches, Literal::String(pattern)) => regex::Regex::new(pattern)
            .err()
            .map(|e| format!("invalid regular expression: {}", e)),
        (FormKind::Matches, other) => Some(format!("'matches' expects a string pattern, found {}", other)),
        (FormKind::Size, Literal::Integer(n)) if *n >= 0 => None,
        (FormKind::Size, other) => Some(format!("'size' expects a non-negative integer, found {}", other)),
        (FormKind::Between, Literal::Integer(_) | Literal::Float(_) | Literal::String(_)) => None,
        (FormKind::Between, other) => Some(format!("'between' bounds must be numbers or strings, found {}", other)),
        _ => None,
    }
}

fn describe_signature(kind: FormKind) -> String {
    let signature = kind.signature();
    let operands = if signature.operands == 1 { "operand" } else { "operands" };
    match signature.literals {
        0 => format!("expected {} {}", signature.operands, operands),
        1 => format!("expected {} {} and 1 argument", signature.operands, operands),
        n => format!("expected {} {} and {} arguments", signature.operands, operands, n),
    }
}

/// Parse Specl source text into a [`Model`].
pub fn parse(source: &str) -> Result<Model, SyntaxErrors> {
    Parser::new(Lexer::new(source)).parse_model()
}
