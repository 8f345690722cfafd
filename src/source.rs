//! Rastreo de ubicaciones originales en código fuente.
//!
//! Los distintos objetos que el compilador construye llevan cuenta
//! de la posición en el código fuente original donde se originaron,
//! lo cual permite señalar un punto exacto en donde ocurre un error
//! de abstracción arbitraria. Las posiciones son pares línea-columna
//! con base 1; la columna cuenta bytes y se reinicia al encontrar
//! un salto de línea.

use std::fmt::{self, Debug, Display, Formatter};

/// Un objeto cualquiera con una posición original asociada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<T> {
    position: Position,
    value: T,
}

impl<T> Located<T> {
    /// Construye a partir de un valor y una posición.
    pub fn at(value: T, position: Position) -> Self {
        Located { value, position }
    }

    /// Obtiene el valor.
    pub fn val(&self) -> &T {
        &self.value
    }

    /// Obtiene la posición.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Descarta la posición y toma ownership del valor.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Descompone y toma ownership de las dos partes.
    pub fn split(self) -> (Position, T) {
        (self.position, self.value)
    }

    /// Transforma el valor con la misma posición.
    pub fn map<U, F>(self, map: F) -> Located<U>
    where
        F: FnOnce(T) -> U,
    {
        Located {
            value: map(self.value),
            position: self.position,
        }
    }
}

impl<T> AsRef<T> for Located<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T: Display> Display for Located<T> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        write!(fmt, "{} at {}", self.value, self.position)
    }
}

/// Una posición línea-columna en un archivo.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Position {
    line: u32,
    column: u32,
}

impl Position {
    /// Construye una posición explícita.
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }

    /// Obtiene el número de línea.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Obtiene el número de columna.
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Incrementa el número de columna.
    pub fn advance(self) -> Position {
        Position {
            line: self.line,
            column: self.column + 1,
        }
    }

    /// Incrementa el número de línea y retorna a la columna 1.
    pub fn newline(self) -> Position {
        Position {
            line: self.line + 1,
            column: 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position { line: 1, column: 1 }
    }
}

impl Display for Position {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.line, self.column)
    }
}

impl Debug for Position {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        <Self as Display>::fmt(self, formatter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_position_is_origin() {
        let position = Position::default();
        assert_eq!(position.line(), 1);
        assert_eq!(position.column(), 1);
    }

    #[test]
    fn advance_moves_column_only() {
        let position = Position::default().advance().advance();
        assert_eq!(position.line(), 1);
        assert_eq!(position.column(), 3);
    }

    #[test]
    fn newline_resets_column() {
        let position = Position::new(3, 17).newline();
        assert_eq!(position.line(), 4);
        assert_eq!(position.column(), 1);
    }

    #[test]
    fn located_map_preserves_position() {
        let located = Located::at(21, Position::new(2, 5));
        let mapped = located.map(|n| n * 2);
        assert_eq!(*mapped.val(), 42);
        assert_eq!(mapped.position(), Position::new(2, 5));
    }

    #[test]
    fn display_is_line_colon_column() {
        assert_eq!(Position::new(7, 12).to_string(), "7:12");
    }
}
