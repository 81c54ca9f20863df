//! Tolerant reader for ambient declaration files.
//!
//! This is deliberately a subset parser: it understands the declaration
//! forms the converter cares about (interfaces, classes, type aliases,
//! enums, namespaces, ambient modules, vars, functions, import/export
//! specifiers) and skips everything else without failing. Real-world
//! `.d.ts` files contain constructs outside the subset; skipping must never
//! abort the file.

use crate::ident::{TsIdent, TsIdentModule, TsQIdent};
use crate::trees::{
    TsDecl, TsDeclClass, TsDeclEnum, TsDeclFunction, TsDeclInterface, TsDeclModule,
    TsDeclNamespace, TsDeclTypeAlias, TsDeclVar, TsFunParam, TsFunSig, TsImport, TsLiteral,
    TsMember, TsMemberFunction, TsMemberProperty, TsParsedFile, TsType, TsTypeRef,
};
use std::sync::Arc;

/// Parse one declaration file. Never fails; unrecognized constructs are
/// skipped.
pub fn parse_file(src: &str) -> TsParsedFile {
    let src = src.trim_start_matches('\u{feff}');
    let mut parser = Parser {
        toks: lex(src),
        pos: 0,
        imports: Vec::new(),
    };
    let members = parser.container_body(false);
    TsParsedFile::new(members, parser.imports)
}

#[derive(Clone, Debug, PartialEq)]
enum Tok {
    Ident(String),
    Str(String),
    Num(String),
    Punct(char),
    Arrow,
    Ellipsis,
}

fn lex(src: &str) -> Vec<Tok> {
    let chars: Vec<char> = src.chars().collect();
    let len = chars.len();
    let mut toks = Vec::new();
    let mut i = 0;
    while i < len {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < len && chars[i] != '\n' {
                i += 1;
            }
        } else if c == '/' && chars.get(i + 1) == Some(&'*') {
            i += 2;
            while i + 1 < len && !(chars[i] == '*' && chars[i + 1] == '/') {
                i += 1;
            }
            i = (i + 2).min(len);
        } else if c == '"' || c == '\'' {
            i += 1;
            let mut value = String::new();
            while i < len && chars[i] != c {
                if chars[i] == '\\' && i + 1 < len {
                    value.push(chars[i + 1]);
                    i += 2;
                } else {
                    value.push(chars[i]);
                    i += 1;
                }
            }
            i += 1;
            toks.push(Tok::Str(value));
        } else if c == '`' {
            // Template literal contents are not modeled.
            i += 1;
            while i < len && chars[i] != '`' {
                if chars[i] == '\\' {
                    i += 1;
                }
                i += 1;
            }
            i += 1;
            toks.push(Tok::Str(String::new()));
        } else if c == '=' && chars.get(i + 1) == Some(&'>') {
            toks.push(Tok::Arrow);
            i += 2;
        } else if c == '.' && chars.get(i + 1) == Some(&'.') && chars.get(i + 2) == Some(&'.') {
            toks.push(Tok::Ellipsis);
            i += 3;
        } else if c.is_ascii_digit() {
            let start = i;
            while i < len && (chars[i].is_ascii_alphanumeric() || chars[i] == '.') {
                i += 1;
            }
            toks.push(Tok::Num(chars[start..i].iter().collect()));
        } else if c.is_alphabetic() || c == '_' || c == '$' {
            let start = i;
            while i < len
                && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$')
            {
                i += 1;
            }
            toks.push(Tok::Ident(chars[start..i].iter().collect()));
        } else {
            toks.push(Tok::Punct(c));
            i += 1;
        }
    }
    toks
}

struct Parser {
    toks: Vec<Tok>,
    pos: usize,
    imports: Vec<TsImport>,
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos)
    }

    fn peek2(&self) -> Option<&Tok> {
        self.toks.get(self.pos + 1)
    }

    fn bump(&mut self) -> Option<Tok> {
        let tok = self.toks.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn at_punct(&self, c: char) -> bool {
        matches!(self.peek(), Some(Tok::Punct(p)) if *p == c)
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.at_punct(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_kw(&self, kw: &str) -> bool {
        matches!(self.peek(), Some(Tok::Ident(s)) if s == kw)
    }

    fn eat_kw(&mut self, kw: &str) -> bool {
        if self.at_kw(kw) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<String> {
        if let Some(Tok::Ident(s)) = self.peek() {
            let s = s.clone();
            self.pos += 1;
            Some(s)
        } else {
            None
        }
    }

    fn str_lit(&mut self) -> Option<String> {
        if let Some(Tok::Str(s)) = self.peek() {
            let s = s.clone();
            self.pos += 1;
            Some(s)
        } else {
            None
        }
    }

    // ---- tolerant skipping -------------------------------------------------

    /// Skip an opener token and its balanced content.
    fn skip_balanced(&mut self, open: char, close: char) {
        let mut depth = 0usize;
        while let Some(tok) = self.bump() {
            if let Tok::Punct(c) = tok {
                if c == open {
                    depth += 1;
                } else if c == close {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
            }
        }
    }

    /// Skip until `;` (consumed) or a container-closing `}` (left in place).
    fn skip_statement(&mut self) {
        loop {
            match self.peek() {
                None => return,
                Some(Tok::Punct(';')) => {
                    self.bump();
                    return;
                }
                Some(Tok::Punct('}')) => return,
                Some(Tok::Punct('{')) => self.skip_balanced('{', '}'),
                Some(Tok::Punct('(')) => self.skip_balanced('(', ')'),
                Some(Tok::Punct('[')) => self.skip_balanced('[', ']'),
                _ => {
                    self.bump();
                }
            }
        }
    }

    // ---- containers --------------------------------------------------------

    fn container_body(&mut self, nested: bool) -> Vec<Arc<TsDecl>> {
        let mut members = Vec::new();
        loop {
            match self.peek() {
                None => break,
                Some(Tok::Punct('}')) if nested => break,
                _ => {}
            }
            if self.eat_punct(';') {
                continue;
            }
            if self.eat_kw("declare") {
                continue;
            }
            if self.at_kw("export") {
                self.handle_export();
                continue;
            }
            if self.at_kw("import") {
                self.handle_import();
                continue;
            }
            if let Some(decl) = self.decl() {
                members.push(decl);
                continue;
            }
            if self.at_punct('}') {
                // stray closing brace at the top level
                self.bump();
                continue;
            }
            self.skip_statement();
        }
        members
    }

    fn nested_body(&mut self) -> Vec<Arc<TsDecl>> {
        let members = self.container_body(true);
        self.eat_punct('}');
        members
    }

    fn decl(&mut self) -> Option<Arc<TsDecl>> {
        if self.at_kw("interface") {
            return Some(self.interface_decl());
        }
        if self.at_kw("abstract") && matches!(self.peek2(), Some(Tok::Ident(s)) if s == "class") {
            self.bump();
            return Some(self.class_decl(true));
        }
        if self.at_kw("class") {
            return Some(self.class_decl(false));
        }
        if self.at_kw("type") && matches!(self.peek2(), Some(Tok::Ident(_))) {
            return Some(self.alias_decl());
        }
        if self.at_kw("enum") {
            return Some(self.enum_decl(false));
        }
        if self.at_kw("const") && matches!(self.peek2(), Some(Tok::Ident(s)) if s == "enum") {
            self.bump();
            return Some(self.enum_decl(true));
        }
        if self.at_kw("namespace") {
            return Some(self.namespace_decl());
        }
        if self.at_kw("module") {
            return Some(self.module_decl());
        }
        if self.at_kw("global") && matches!(self.peek2(), Some(Tok::Punct('{'))) {
            self.bump();
            self.eat_punct('{');
            let members = self.nested_body();
            return Some(Arc::new(TsDecl::Namespace(TsDeclNamespace {
                name: TsIdent::from("global"),
                members,
            })));
        }
        if self.at_kw("var") || self.at_kw("let") || self.at_kw("const") {
            return Some(self.var_decl());
        }
        if self.at_kw("function") {
            return Some(self.function_decl());
        }
        None
    }

    // ---- imports / exports -------------------------------------------------

    fn handle_import(&mut self) {
        self.bump(); // import
        self.eat_kw("type");
        if let Some(spec) = self.str_lit() {
            self.imports.push(TsImport { from: spec });
            self.skip_statement();
            return;
        }
        loop {
            match self.peek() {
                None => return,
                Some(Tok::Punct(';')) => {
                    self.bump();
                    return;
                }
                Some(Tok::Punct('}')) => return,
                Some(Tok::Punct('{')) => self.skip_balanced('{', '}'),
                Some(Tok::Ident(s)) if s == "from" => {
                    self.bump();
                    if let Some(spec) = self.str_lit() {
                        self.imports.push(TsImport { from: spec });
                    }
                    self.skip_statement();
                    return;
                }
                Some(Tok::Ident(s)) if s == "require" => {
                    // import x = require("spec")
                    self.bump();
                    if self.eat_punct('(')
                        && let Some(spec) = self.str_lit()
                    {
                        self.imports.push(TsImport { from: spec });
                    }
                    self.skip_statement();
                    return;
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn handle_export(&mut self) {
        self.bump(); // export
        if self.eat_punct('=') {
            self.skip_statement();
            return;
        }
        self.eat_kw("type");
        if self.at_punct('*') || self.at_punct('{') {
            // export * from "..." / export { ... } [from "..."]
            loop {
                match self.peek() {
                    None => return,
                    Some(Tok::Punct(';')) => {
                        self.bump();
                        return;
                    }
                    Some(Tok::Punct('}')) => return,
                    Some(Tok::Punct('{')) => self.skip_balanced('{', '}'),
                    Some(Tok::Ident(s)) if s == "from" => {
                        self.bump();
                        if let Some(spec) = self.str_lit() {
                            self.imports.push(TsImport { from: spec });
                        }
                        self.skip_statement();
                        return;
                    }
                    _ => {
                        self.bump();
                    }
                }
            }
        }
        self.eat_kw("default");
        // a modifier before a declaration: the container loop parses what follows
    }

    // ---- declarations ------------------------------------------------------

    fn decl_name(&mut self) -> TsIdent {
        TsIdent::from(self.ident().unwrap_or_else(|| "_".to_string()))
    }

    fn interface_decl(&mut self) -> Arc<TsDecl> {
        self.bump(); // interface
        let name = self.decl_name();
        let tparams = self.type_params();
        let mut inheritance = Vec::new();
        if self.eat_kw("extends") {
            loop {
                match self.type_ref() {
                    Some(r) => inheritance.push(r),
                    None => break,
                }
                if !self.eat_punct(',') {
                    break;
                }
            }
        }
        let members = if self.eat_punct('{') {
            self.object_members()
        } else {
            Vec::new()
        };
        Arc::new(TsDecl::Interface(TsDeclInterface {
            name,
            tparams,
            inheritance,
            members,
        }))
    }

    fn class_decl(&mut self, is_abstract: bool) -> Arc<TsDecl> {
        self.bump(); // class
        let name = self.decl_name();
        let tparams = self.type_params();
        let mut parent = None;
        let mut implements = Vec::new();
        loop {
            if self.eat_kw("extends") {
                parent = self.type_ref();
            } else if self.eat_kw("implements") {
                loop {
                    match self.type_ref() {
                        Some(r) => implements.push(r),
                        None => break,
                    }
                    if !self.eat_punct(',') {
                        break;
                    }
                }
            } else {
                break;
            }
        }
        let members = if self.eat_punct('{') {
            self.object_members()
        } else {
            Vec::new()
        };
        Arc::new(TsDecl::Class(TsDeclClass {
            name,
            tparams,
            parent,
            implements,
            members,
            is_abstract,
        }))
    }

    fn alias_decl(&mut self) -> Arc<TsDecl> {
        self.bump(); // type
        let name = self.decl_name();
        let tparams = self.type_params();
        self.eat_punct('=');
        let alias = self.parse_type();
        self.skip_statement();
        Arc::new(TsDecl::TypeAlias(TsDeclTypeAlias {
            name,
            tparams,
            alias,
        }))
    }

    fn enum_decl(&mut self, is_const: bool) -> Arc<TsDecl> {
        self.bump(); // enum
        let name = self.decl_name();
        let mut members = Vec::new();
        if self.eat_punct('{') {
            loop {
                match self.peek() {
                    None => break,
                    Some(Tok::Punct('}')) => {
                        self.bump();
                        break;
                    }
                    _ => {}
                }
                if self.eat_punct(',') || self.eat_punct(';') {
                    continue;
                }
                match self.bump() {
                    Some(Tok::Ident(s) | Tok::Str(s)) => {
                        members.push(TsIdent::from(s));
                        if self.eat_punct('=') {
                            self.skip_enum_init();
                        }
                    }
                    _ => {}
                }
            }
        }
        Arc::new(TsDecl::Enum(TsDeclEnum {
            name,
            members,
            is_const,
        }))
    }

    fn skip_enum_init(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => return,
                Some(Tok::Punct(',' | '}')) if depth == 0 => return,
                Some(Tok::Punct('(' | '[' | '{')) => {
                    depth += 1;
                    self.bump();
                }
                Some(Tok::Punct(')' | ']' | '}')) => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn namespace_decl(&mut self) -> Arc<TsDecl> {
        self.bump(); // namespace (or module with an identifier name)
        let mut names = Vec::new();
        loop {
            match self.ident() {
                Some(n) => names.push(n),
                None => break,
            }
            if !self.eat_punct('.') {
                break;
            }
        }
        if names.is_empty() {
            names.push("_".to_string());
        }
        let members = if self.eat_punct('{') {
            self.nested_body()
        } else {
            Vec::new()
        };
        // `namespace A.B.C {}` nests from the inside out
        let mut decl = TsDeclNamespace {
            name: TsIdent::from(names.pop().expect("nonempty")),
            members,
        };
        while let Some(outer) = names.pop() {
            decl = TsDeclNamespace {
                name: TsIdent::from(outer),
                members: vec![Arc::new(TsDecl::Namespace(decl))],
            };
        }
        Arc::new(TsDecl::Namespace(decl))
    }

    fn module_decl(&mut self) -> Arc<TsDecl> {
        if matches!(self.peek2(), Some(Tok::Str(_))) {
            self.bump(); // module
            let spec = self.str_lit().expect("checked string literal");
            let members = if self.eat_punct('{') {
                self.nested_body()
            } else {
                Vec::new()
            };
            Arc::new(TsDecl::Module(TsDeclModule {
                name: TsIdentModule::parse(&spec),
                members,
            }))
        } else {
            // `declare module Foo {}` behaves like a namespace
            self.namespace_decl()
        }
    }

    fn var_decl(&mut self) -> Arc<TsDecl> {
        let kw = self.ident().expect("checked keyword");
        let name = self.decl_name();
        self.eat_punct('!');
        let tpe = if self.eat_punct(':') {
            Some(self.parse_type())
        } else {
            None
        };
        self.skip_statement();
        Arc::new(TsDecl::Var(TsDeclVar {
            name,
            tpe,
            readonly: kw == "const",
        }))
    }

    fn function_decl(&mut self) -> Arc<TsDecl> {
        self.bump(); // function
        let name = self.decl_name();
        let tparams = self.type_params();
        let params = self.params();
        let ret = if self.eat_punct(':') {
            Some(self.parse_type())
        } else {
            None
        };
        self.skip_statement();
        Arc::new(TsDecl::Function(TsDeclFunction {
            name,
            signature: TsFunSig {
                tparams,
                params,
                ret,
            },
        }))
    }

    // ---- members -----------------------------------------------------------

    /// Parse members up to and including the closing `}`.
    fn object_members(&mut self) -> Vec<TsMember> {
        let mut out = Vec::new();
        loop {
            match self.peek() {
                None => break,
                Some(Tok::Punct('}')) => {
                    self.bump();
                    break;
                }
                _ => {}
            }
            if self.eat_punct(';') || self.eat_punct(',') {
                continue;
            }
            let mut readonly = false;
            loop {
                let is_modifier_pos =
                    !matches!(self.peek2(), Some(Tok::Punct('(' | ':' | '?' | '<')));
                if self.at_kw("readonly") && is_modifier_pos {
                    self.bump();
                    readonly = true;
                } else if (self.at_kw("public")
                    || self.at_kw("private")
                    || self.at_kw("protected")
                    || self.at_kw("static")
                    || self.at_kw("abstract")
                    || self.at_kw("declare")
                    || self.at_kw("override"))
                    && is_modifier_pos
                {
                    self.bump();
                } else {
                    break;
                }
            }
            if (self.at_kw("get") || self.at_kw("set"))
                && matches!(self.peek2(), Some(Tok::Ident(_) | Tok::Str(_)))
            {
                // accessor keyword, the real name follows
                self.bump();
            }
            match self.peek() {
                Some(Tok::Punct('[')) => {
                    // index signature or computed name: not modeled
                    self.skip_balanced('[', ']');
                    if self.eat_punct(':') {
                        let _ = self.parse_type();
                    }
                    self.skip_member_tail();
                }
                Some(Tok::Punct('(' | '<')) => {
                    // call signature: not modeled
                    if self.at_punct('<') {
                        let _ = self.type_params();
                    }
                    if self.at_punct('(') {
                        let _ = self.params();
                        if self.eat_punct(':') {
                            let _ = self.parse_type();
                        }
                    }
                    self.skip_member_tail();
                }
                Some(Tok::Ident(_) | Tok::Str(_) | Tok::Num(_)) => {
                    let name = match self.bump() {
                        Some(Tok::Ident(s) | Tok::Str(s) | Tok::Num(s)) => s,
                        _ => unreachable!("peeked a name token"),
                    };
                    let optional = self.eat_punct('?');
                    let tparams = self.type_params();
                    if self.at_punct('(') {
                        let params = self.params();
                        let ret = if self.eat_punct(':') {
                            Some(self.parse_type())
                        } else {
                            None
                        };
                        out.push(TsMember::Function(TsMemberFunction {
                            name: TsIdent::from(name),
                            signature: TsFunSig {
                                tparams,
                                params,
                                ret,
                            },
                            optional,
                        }));
                    } else if self.eat_punct(':') {
                        let tpe = self.parse_type();
                        out.push(TsMember::Property(TsMemberProperty {
                            name: TsIdent::from(name),
                            tpe: Some(tpe),
                            optional,
                            readonly,
                        }));
                    } else {
                        out.push(TsMember::Property(TsMemberProperty {
                            name: TsIdent::from(name),
                            tpe: None,
                            optional,
                            readonly,
                        }));
                    }
                    self.skip_member_tail();
                }
                _ => {
                    self.bump();
                }
            }
        }
        out
    }

    /// Skip member leftovers until `;`/`,` (consumed) or `}` (left in place).
    fn skip_member_tail(&mut self) {
        loop {
            match self.peek() {
                None => return,
                Some(Tok::Punct(';' | ',')) => {
                    self.bump();
                    return;
                }
                Some(Tok::Punct('}')) => return,
                Some(Tok::Punct('{')) => self.skip_balanced('{', '}'),
                Some(Tok::Punct('(')) => self.skip_balanced('(', ')'),
                Some(Tok::Punct('[')) => self.skip_balanced('[', ']'),
                _ => {
                    self.bump();
                }
            }
        }
    }

    // ---- types -------------------------------------------------------------

    /// Declared type parameter names; bounds and defaults are skipped.
    fn type_params(&mut self) -> Vec<TsIdent> {
        if !self.at_punct('<') {
            return Vec::new();
        }
        self.bump();
        let mut out = Vec::new();
        let mut depth = 1usize;
        let mut expect_name = true;
        while let Some(tok) = self.bump() {
            match tok {
                Tok::Punct('<') => depth += 1,
                Tok::Punct('>') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Tok::Punct(',') if depth == 1 => expect_name = true,
                Tok::Ident(s) if expect_name => {
                    out.push(TsIdent::from(s));
                    expect_name = false;
                }
                _ => {}
            }
        }
        out
    }

    fn type_ref(&mut self) -> Option<TsTypeRef> {
        let first = self.ident()?;
        let mut parts = vec![first];
        while self.at_punct('.') {
            self.bump();
            match self.ident() {
                Some(next) => parts.push(next),
                None => break,
            }
        }
        let tparams = if self.at_punct('<') {
            self.type_args()
        } else {
            Vec::new()
        };
        Some(TsTypeRef {
            name: TsQIdent::of(parts.into_iter().map(TsIdent::from)),
            tparams,
        })
    }

    fn type_args(&mut self) -> Vec<TsType> {
        self.bump(); // '<'
        let mut out = Vec::new();
        loop {
            if self.eat_punct('>') || self.peek().is_none() {
                break;
            }
            out.push(self.parse_type());
            if self.eat_punct(',') {
                continue;
            }
            if !self.eat_punct('>') {
                // unsupported construct inside the argument list
                loop {
                    match self.peek() {
                        None | Some(Tok::Punct(';' | '}')) => break,
                        Some(Tok::Punct('>')) => {
                            self.bump();
                            break;
                        }
                        _ => {
                            self.bump();
                        }
                    }
                }
            }
            break;
        }
        out
    }

    fn parse_type(&mut self) -> TsType {
        self.eat_punct('|'); // leading pipe is legal
        let mut parts = vec![self.intersect_type()];
        while self.eat_punct('|') {
            parts.push(self.intersect_type());
        }
        if parts.len() == 1 {
            parts.pop().expect("single part")
        } else {
            TsType::Union(parts)
        }
    }

    fn intersect_type(&mut self) -> TsType {
        let mut parts = vec![self.postfix_type()];
        while self.eat_punct('&') {
            parts.push(self.postfix_type());
        }
        if parts.len() == 1 {
            parts.pop().expect("single part")
        } else {
            TsType::Intersect(parts)
        }
    }

    fn postfix_type(&mut self) -> TsType {
        let mut tpe = self.primary_type();
        while self.at_punct('[') {
            if matches!(self.peek2(), Some(Tok::Punct(']'))) {
                self.bump();
                self.bump();
                tpe = TsType::Ref(TsTypeRef {
                    name: TsQIdent::single("Array"),
                    tparams: vec![tpe],
                });
            } else {
                // indexed access `T[K]`: not modeled
                self.skip_balanced('[', ']');
            }
        }
        tpe
    }

    fn primary_type(&mut self) -> TsType {
        match self.peek() {
            Some(Tok::Punct('{')) => {
                self.bump();
                TsType::Object(self.object_members())
            }
            Some(Tok::Punct('(')) => {
                if self.paren_is_function() {
                    self.function_type()
                } else {
                    self.bump();
                    let tpe = self.parse_type();
                    self.eat_punct(')');
                    tpe
                }
            }
            Some(Tok::Punct('[')) => {
                self.bump();
                let mut elems = Vec::new();
                loop {
                    if self.eat_punct(']') || self.peek().is_none() {
                        break;
                    }
                    if matches!(self.peek(), Some(Tok::Ellipsis)) {
                        self.bump();
                    }
                    elems.push(self.parse_type());
                    if !self.eat_punct(',') {
                        self.eat_punct(']');
                        break;
                    }
                }
                TsType::Tuple(elems)
            }
            Some(Tok::Str(_)) => {
                let s = self.str_lit().expect("peeked string");
                TsType::Literal(TsLiteral::Str(s))
            }
            Some(Tok::Num(_)) => match self.bump() {
                Some(Tok::Num(n)) => TsType::Literal(TsLiteral::Num(n)),
                _ => unreachable!("peeked number"),
            },
            Some(Tok::Ident(ident)) => {
                let ident = ident.clone();
                match ident.as_str() {
                    "true" => {
                        self.bump();
                        TsType::Literal(TsLiteral::Bool(true))
                    }
                    "false" => {
                        self.bump();
                        TsType::Literal(TsLiteral::Bool(false))
                    }
                    "new" if matches!(self.peek2(), Some(Tok::Punct('('))) => {
                        self.bump();
                        self.function_type()
                    }
                    // type operators are treated as transparent in the subset
                    "keyof" | "typeof" | "readonly" | "unique" | "infer" => {
                        self.bump();
                        self.postfix_type()
                    }
                    _ => match self.type_ref() {
                        Some(r) => TsType::Ref(r),
                        None => TsType::Ref(TsTypeRef::named(TsQIdent::single("any"))),
                    },
                }
            }
            _ => {
                self.bump();
                TsType::Ref(TsTypeRef::named(TsQIdent::single("any")))
            }
        }
    }

    /// From a `(` token, look ahead to the matching `)` and test for `=>`.
    fn paren_is_function(&self) -> bool {
        let mut depth = 0usize;
        let mut j = self.pos;
        while let Some(tok) = self.toks.get(j) {
            match tok {
                Tok::Punct('(') => depth += 1,
                Tok::Punct(')') => {
                    depth -= 1;
                    if depth == 0 {
                        return matches!(self.toks.get(j + 1), Some(Tok::Arrow));
                    }
                }
                _ => {}
            }
            j += 1;
        }
        false
    }

    fn function_type(&mut self) -> TsType {
        let params = self.params();
        if matches!(self.peek(), Some(Tok::Arrow)) {
            self.bump();
        }
        let ret = self.parse_type();
        TsType::Function(Box::new(TsFunSig {
            tparams: Vec::new(),
            params,
            ret: Some(ret),
        }))
    }

    /// Parameter list, from `(` through the matching `)`.
    fn params(&mut self) -> Vec<TsFunParam> {
        let mut out = Vec::new();
        if !self.eat_punct('(') {
            return out;
        }
        loop {
            match self.peek() {
                None => break,
                Some(Tok::Punct(')')) => {
                    self.bump();
                    break;
                }
                _ => {}
            }
            if matches!(self.peek(), Some(Tok::Ellipsis)) {
                self.bump();
            }
            let name = match self.peek() {
                Some(Tok::Ident(_)) => self.ident().expect("peeked ident"),
                Some(Tok::Punct('{')) => {
                    self.skip_balanced('{', '}');
                    format!("arg{}", out.len())
                }
                Some(Tok::Punct('[')) => {
                    self.skip_balanced('[', ']');
                    format!("arg{}", out.len())
                }
                _ => {
                    self.bump();
                    continue;
                }
            };
            self.eat_punct('?');
            let tpe = if self.eat_punct(':') {
                Some(self.parse_type())
            } else {
                None
            };
            if self.eat_punct('=') {
                self.skip_param_default();
            }
            out.push(TsFunParam {
                name: TsIdent::from(name),
                tpe,
            });
            self.eat_punct(',');
        }
        out
    }

    fn skip_param_default(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => return,
                Some(Tok::Punct(',' | ')')) if depth == 0 => return,
                Some(Tok::Punct('(' | '[' | '{')) => {
                    depth += 1;
                    self.bump();
                }
                Some(Tok::Punct(')' | ']' | '}')) => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }
}
