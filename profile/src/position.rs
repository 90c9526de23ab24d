// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
use core::ops;

/// A point in the plane, in real space or in Fourier space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    pub const fn origin() -> Self {
        Position { x: 0.0, y: 0.0 }
    }

    /// The squared distance from the origin.
    pub fn norm_sqr(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }
}

impl ops::Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position::new(self.x + other.x, self.y + other.y)
    }
}

impl ops::Sub for Position {
    type Output = Position;

    fn sub(self, other: Position) -> Position {
        Position::new(self.x - other.x, self.y - other.y)
    }
}

impl ops::Neg for Position {
    type Output = Position;

    fn neg(self) -> Position {
        Position::new(-self.x, -self.y)
    }
}

impl ops::Mul<f64> for Position {
    type Output = Position;

    fn mul(self, factor: f64) -> Position {
        Position::new(self.x * factor, self.y * factor)
    }
}
