//! Builders for hand-written package trees
#![allow(dead_code)]

use dirtycheck_core::{Expr, FuncDecl, ImportDecl, PackageTree, Position, SourceFile};

pub fn pos(line: u32) -> Position {
    Position::new("pkg/lib.src", line, 1)
}

/// `name(...)` as a statement
pub fn call(name: &str, line: u32) -> Expr {
    Expr::Call {
        callee: Box::new(Expr::Ident {
            name: name.to_string(),
            position: pos(line),
        }),
        args: vec![],
        position: pos(line),
    }
}

/// `base.name(...)` where `base` is a plain identifier
pub fn selector_call(base: &str, name: &str, line: u32) -> Expr {
    Expr::Call {
        callee: Box::new(Expr::Selector {
            base: Box::new(Expr::Ident {
                name: base.to_string(),
                position: pos(line),
            }),
            name: name.to_string(),
            position: pos(line),
        }),
        args: vec![],
        position: pos(line),
    }
}

pub fn func(name: &str, doc: &[&str], body: Vec<Expr>) -> FuncDecl {
    let mut decl = FuncDecl::new(name);
    decl.doc = doc.iter().map(|s| s.to_string()).collect();
    decl.body = body;
    decl.position = pos(1);
    decl
}

pub fn method(receiver: &str, name: &str, doc: &[&str], body: Vec<Expr>) -> FuncDecl {
    let mut decl = func(name, doc, body);
    decl.receiver = Some(receiver.to_string());
    decl
}

pub fn package(path: &str, imports: &[&str], functions: Vec<FuncDecl>) -> PackageTree {
    let mut file = SourceFile::new(format!("{}/lib.src", path.rsplit('/').next().unwrap()));
    file.imports = imports.iter().map(|p| ImportDecl::new(*p)).collect();
    file.functions = functions;

    let mut tree = PackageTree::new(path);
    tree.files.push(file);
    tree
}
