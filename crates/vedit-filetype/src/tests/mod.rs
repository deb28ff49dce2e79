//! Cascade tests for the classifier.
