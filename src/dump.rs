//! Volcado de tokens a archivo.
//!
//! El formato de archivo es un contrato estable consumido por
//! herramientas externas: un registro por línea con campos separados
//! por espacios, encabezados de comentario con la numeración gruesa de
//! tipos y la tabla de palabras clave, y una línea final con el total.
//! Los registros de palabra clave agregan el índice ordenado de la
//! tabla de palabras reservadas.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::lex::{Token, TokenKind};

/// Directorio de salida por omisión para los archivos de tokens.
pub const DEFAULT_OUTPUT_DIR: &str = "docs/Analizador-sintactico/archivos_parser";

/// Ruta de salida por omisión: `<dir>/<base>_tokens.txt`.
pub fn default_output_path(source_path: &Path) -> PathBuf {
    let base = source_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("fuente");

    Path::new(DEFAULT_OUTPUT_DIR).join(format!("{}_tokens.txt", base))
}

/// Escribe el volcado completo de tokens sobre el destino dado.
pub fn write_tokens(
    out: &mut impl Write,
    tokens: &[Token],
    source_path: &Path,
) -> io::Result<()> {
    writeln!(out, "# Tokens generados desde: {}", source_path.display())?;
    writeln!(
        out,
        "# Formato: tipo_token lexema linea columna [indice_palabra_clave]"
    )?;
    writeln!(
        out,
        "# Tipos: IDENTIFIER=0 NUMBER=1 STRING=2 OPERATOR=3 DELIMITER=4 KEYWORD=5 UNKNOWN=6 EOF=7"
    )?;
    writeln!(
        out,
        "# Palabras clave: fn=0 let=1 mut=2 if=3 else=4 match=5 while=6 loop=7 for=8 in=9 break=10 continue=11 return=12 true=13 false=14"
    )?;
    writeln!(out)?;

    for token in tokens {
        let lexeme = if token.lexeme.is_empty() {
            "NULL"
        } else {
            token.lexeme.as_str()
        };

        write!(
            out,
            "{} {} {} {}",
            token.kind.category().code(),
            lexeme,
            token.position.line(),
            token.position.column()
        )?;

        if let TokenKind::Keyword(keyword) = token.kind {
            write!(out, " {}", keyword.index())?;
        }

        writeln!(out)?;
    }

    writeln!(out, "# Total de tokens: {}", tokens.len())
}

/// Escribe el volcado en la ruta por omisión, creando los directorios
/// intermedios si hace falta, y retorna la ruta final.
pub fn dump_to_default_path(tokens: &[Token], source_path: &Path) -> io::Result<PathBuf> {
    let output_path = default_output_path(source_path);
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(&output_path)?;
    write_tokens(&mut file, tokens, source_path)?;

    debug!("volcado de {} tokens en {}", tokens.len(), output_path.display());
    Ok(output_path)
}
