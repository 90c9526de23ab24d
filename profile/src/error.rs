// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers

/// Errors of evaluating or rendering a profile.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The destination grid rejected an access.
    #[error(transparent)]
    Grid(#[from] sky_grid::Error),
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    /// The profile only has a representation in Fourier space.
    #[error("{0} can not be evaluated in real space")]
    NotAnalytic(&'static str),
    #[error("{0} does not support {1}")]
    Unsupported(&'static str, &'static str),
}
