// Question generation: templates, a Markov chain over stored questions and
// nearest-word substitution from static embeddings. No network calls.

pub mod embeddings;
pub mod generator;
pub mod handlers;
pub mod markov;
pub mod templates;
