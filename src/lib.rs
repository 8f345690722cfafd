//! Frontend léxico y sintáctico de un lenguaje imperativo pequeño
//! orientado a expresiones.
//!
//! El crate transforma texto fuente en una de dos salidas: un flujo de
//! tokens clasificados con posiciones precisas, o un árbol de sintaxis
//! abstracta listo para fases semánticas posteriores.
//!
//! La tubería es pura y síncrona: fuente → [`lex::Lexer`] → tokens →
//! [`parse::Parser`] → [`ast::Program`], más a lo sumo un diagnóstico.
//! El lexer es total sobre cualquier entrada de bytes; los errores
//! sintácticos abortan el análisis con un único error posicionado.

pub mod ast;
pub mod dump;
pub mod lex;
pub mod parse;
pub mod source;
