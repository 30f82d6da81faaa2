//! Lowering: parsed declarations → [`Declaration`]s with resolved supertypes.

use std::collections::HashSet;

use suitegen_core::lang::conventions::CONSTRUCTOR_NAME;
use suitegen_core::types::{ConstructorDescriptor, Declaration, FunctionSig, MethodDescriptor, SupertypeRef};
use suitegen_core::{DeclKind, DeclaredType, TypeName};
use suitegen_syntax::ast::{self, MethodDecl, Program, Spanned, TypeRef};
use suitegen_syntax::diagnostics::CompileError;

use super::resolve::{KnownTypes, Scope};
use crate::config::ResolutionMode;

pub(crate) struct LowerOptions<'a> {
    pub(crate) mode: ResolutionMode,
    pub(crate) universal_root: &'a TypeName,
}

/// Lowered declarations of one file, in source order, and the errors found on the way.
#[derive(Debug, Default)]
pub(crate) struct Lowered {
    pub(crate) declarations: Vec<Declaration>,
    pub(crate) errors: Vec<CompileError>,
}

pub(crate) fn lower(program: &Program, package: &str, known: &KnownTypes, options: &LowerOptions<'_>) -> Lowered {
    let mut lowerer = Lowerer {
        scope: Scope::new(package, known),
        package,
        known,
        options,
        errors: Vec::new(),
    };

    for decl in &program.declarations {
        let ast::Declaration::Import(import) = &decl.node else {
            continue;
        };
        if let Err(message) = lowerer.scope.import(import) {
            match options.mode {
                ResolutionMode::Strict => lowerer.errors.push(CompileError::resolution(message, decl.span)),
                ResolutionMode::Lenient => tracing::warn!(package, "{message}"),
            }
        }
    }

    let mut declarations = Vec::new();
    for decl in &program.declarations {
        match &decl.node {
            ast::Declaration::Class(class) => {
                declarations.push(Declaration::Type(lowerer.class(class)));
            }
            ast::Declaration::Trait(tr) => {
                declarations.push(Declaration::Type(lowerer.trait_(tr)));
            }
            ast::Declaration::Function(func) => declarations.push(Declaration::Function(FunctionSig {
                name: func.name.clone(),
                arity: func.params.len(),
            })),
            ast::Declaration::Package(_) | ast::Declaration::Import(_) => {}
        }
    }

    Lowered {
        declarations,
        errors: lowerer.errors,
    }
}

struct Lowerer<'a> {
    scope: Scope<'a>,
    package: &'a str,
    known: &'a KnownTypes,
    options: &'a LowerOptions<'a>,
    errors: Vec<CompileError>,
}

impl Lowerer<'_> {
    fn class(&mut self, class: &ast::ClassDecl) -> DeclaredType {
        let mut ty = DeclaredType::class(TypeName::new(self.package, &class.name)).with_visibility(class.visibility);
        ty.is_abstract = class.is_abstract;

        match &class.extends {
            Some(base) => {
                if let Some(supertype) = self.supertype(&ty.name, base, DeclKind::Class) {
                    ty.supertypes.push(supertype);
                }
            }
            // Every class other than the root itself implicitly extends the root
            None if ty.name != *self.options.universal_root => {
                ty.supertypes
                    .push(SupertypeRef::Resolved(self.options.universal_root.clone()));
            }
            None => {}
        }
        for tr in &class.traits {
            if let Some(supertype) = self.supertype(&ty.name, tr, DeclKind::Trait) {
                ty.supertypes.push(supertype);
            }
        }

        let mut arities = HashSet::new();
        for method in &class.methods {
            if method.node.name == CONSTRUCTOR_NAME {
                let arity = method.node.params.len();
                if !arities.insert(arity) && self.options.mode == ResolutionMode::Strict {
                    self.errors.push(CompileError::resolution(
                        format!("duplicate constructor of '{}' taking {arity} argument(s)", ty.name),
                        method.span,
                    ));
                }
                ty.constructors
                    .push(ConstructorDescriptor::new(arity, method.node.visibility));
            } else if let Some(descriptor) = instance_method(method) {
                ty.methods.push(descriptor);
            }
        }
        if ty.constructors.is_empty() {
            ty.constructors.push(ConstructorDescriptor::new(0, class.visibility));
        }

        ty
    }

    fn trait_(&mut self, tr: &ast::TraitDecl) -> DeclaredType {
        let mut ty = DeclaredType::trait_(TypeName::new(self.package, &tr.name)).with_visibility(tr.visibility);

        for parent in &tr.traits {
            if let Some(supertype) = self.supertype(&ty.name, parent, DeclKind::Trait) {
                ty.supertypes.push(supertype);
            }
        }
        for method in &tr.methods {
            if method.node.name == CONSTRUCTOR_NAME {
                self.errors.push(
                    CompileError::resolution(format!("trait '{}' cannot declare a constructor", ty.name), method.span)
                        .with_hint("Declare the constructor on an implementing class"),
                );
            } else if let Some(descriptor) = instance_method(method) {
                ty.methods.push(descriptor);
            }
        }

        ty
    }

    /// Resolve one direct supertype, checking it has the kind its position requires.
    fn supertype(&mut self, owner: &TypeName, written: &Spanned<TypeRef>, expected: DeclKind) -> Option<SupertypeRef> {
        let Some(name) = self.scope.resolve(&written.node.name) else {
            let dotted = written.node.name.dotted();
            return match self.options.mode {
                ResolutionMode::Lenient => Some(SupertypeRef::Unresolved(dotted)),
                ResolutionMode::Strict => {
                    self.errors.push(
                        CompileError::resolution(format!("cannot resolve supertype '{dotted}' of '{owner}'"), written.span)
                            .with_hint("Import the type or use its fully qualified name"),
                    );
                    None
                }
            };
        };

        match (expected, self.known.kind_of(&name)) {
            (DeclKind::Class, Some(DeclKind::Trait)) => {
                self.errors.push(
                    CompileError::resolution(format!("'{owner}' cannot extend trait '{name}'"), written.span)
                        .with_hint("List traits after 'with'"),
                );
                None
            }
            (DeclKind::Trait, Some(DeclKind::Class)) => {
                self.errors.push(
                    CompileError::resolution(format!("'{name}' is a class; only traits can follow 'with'"), written.span)
                        .with_hint("Use 'extends' for the base class"),
                );
                None
            }
            _ => Some(SupertypeRef::Resolved(name)),
        }
    }
}

/// Reflective view of a method; functions without a receiver are not instance methods.
fn instance_method(method: &Spanned<MethodDecl>) -> Option<MethodDescriptor> {
    method.node.has_receiver.then(|| MethodDescriptor {
        name: method.node.name.clone(),
        arity: method.node.params.len(),
        visibility: method.node.visibility,
    })
}
