//! Punto de entrada ("driver").
//!
//! Este módulo orquesta las fases de análisis y expone una CLI. El
//! código de salida es 0 en éxito y 1 ante cualquier error, incluidos
//! los errores de sintaxis reportados por el parser.

use std::path::Path;
use std::process;

use anyhow::Context;
use clap::{crate_version, Arg, Command};
use log::{debug, info};

use compilador::dump;
use compilador::lex::{tokenize_all, Lexer};
use compilador::parse::Parser;

fn main() -> anyhow::Result<()> {
    simple_logger::init_with_level(log::Level::Warn).expect("logger ya inicializado");

    let args = Command::new("compilador")
        .version(crate_version!())
        .about("Analizador léxico y sintáctico")
        .arg(
            Arg::new("lex")
                .short('l')
                .long("lex")
                .help("Solo análisis léxico: imprime la tabla de tokens"),
        )
        .arg(
            Arg::new("parse")
                .short('p')
                .long("parse")
                .help("Análisis sintáctico: imprime el AST"),
        )
        .arg(
            Arg::new("tokens")
                .short('t')
                .long("tokens")
                .help("Escribe el archivo de tokens para herramientas externas"),
        )
        .arg(
            Arg::new("stats")
                .short('s')
                .long("stats")
                .help("Imprime estadísticas del parser"),
        )
        .arg(
            Arg::new("source")
                .value_name("ARCHIVO")
                .required(true)
                .help("Ruta del archivo fuente"),
        )
        .get_matches();

    let source_path = Path::new(args.value_of("source").expect("argumento requerido"));
    let source = std::fs::read_to_string(source_path)
        .with_context(|| format!("No se pudo leer el archivo fuente: {}", source_path.display()))?;
    debug!("fuente de {} bytes", source.len());

    let lex_only = args.is_present("lex");
    let write_tokens = args.is_present("tokens");
    let show_ast = args.is_present("parse");
    let show_stats = args.is_present("stats");

    if lex_only || write_tokens {
        let tokens = tokenize_all(&source);

        if lex_only {
            println!("{:<12} {:<24} {:>6} {:>8}", "TIPO", "LEXEMA", "LINEA", "COLUMNA");
            for token in &tokens {
                println!(
                    "{:<12} {:<24} {:>6} {:>8}",
                    token.kind.category().name(),
                    token.lexeme,
                    token.position.line(),
                    token.position.column()
                );
            }
        }

        if write_tokens {
            let output_path = dump::dump_to_default_path(&tokens, source_path)
                .context("No se pudo escribir el archivo de tokens")?;
            info!("archivo de tokens escrito en {}", output_path.display());
        }
    }

    if show_ast || show_stats || !(lex_only || write_tokens) {
        let mut parser = Parser::new(Lexer::new(&source));

        let program = match parser.parse() {
            Ok(program) => program,
            Err(error) => {
                eprintln!("error: {}", error.val());
                eprintln!(" --> {}:{}", source_path.display(), error.position());
                process::exit(1);
            }
        };

        if show_ast || !(lex_only || write_tokens || show_stats) {
            print!("{}", program);
        }

        if show_stats {
            let stats = parser.stats();
            println!();
            println!("Estadísticas del parser:");
            println!("  Expresiones analizadas: {}", stats.expressions);
            println!("  Reducciones:            {}", stats.reductions);
        }
    }

    Ok(())
}
