/// A marker type indicating that a model is **not yet trained**.
///
/// Models parameterized by `Unfitted` expose their hyperparameters and a
/// `fit` method; `predict` is not available until fitting produces the
/// `Fitted` counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unfitted;

/// A marker type indicating that a model has been **fully trained**.
///
/// A `Fitted` model carries only what inference needs: coefficients,
/// intercept and the ordered names of the features it was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fitted;
