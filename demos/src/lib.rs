//! Bundled example fixtures, grounded in `waferslim/examples/*.py`: an
//! `Echo` fixture (scenario S1), a `ListHolder` fixture (scenario 5's
//! isolation property and scenario S5's symbol round trip), a pair of
//! method-naming demo fixtures (testable property 4), and a `Bomb` fixture
//! that can be made to raise a batch-aborting error on demand (scenario 6).
//!
//! None of this is part of the protocol core; it exists so `slimd` has
//! something to serve out of the box and so the integration tests in
//! `slim-server`/`slim-session` can exercise a real import-by-dotted-name
//! path instead of hand-registering fixtures per test.

mod bomb;
mod echo;
mod list_holder;
mod method_names;

use slim_fixtures::FixtureCatalog;

/// Registers every bundled fixture into the process-wide catalog, each
/// under the dotted name a client would use in an `Import` instruction.
/// Safe to call more than once (catalog registration is idempotent per
/// key).
pub fn register() {
    let catalog = FixtureCatalog::global();
    catalog.register("demos.echo", vec![echo::descriptor()]);
    catalog.register("demos.list_holder", vec![list_holder::descriptor()]);
    catalog.register(
        "demos.method_names",
        vec![
            method_names::pythonic_descriptor(),
            method_names::camel_case_descriptor(),
        ],
    );
    catalog.register("demos.bomb", vec![bomb::descriptor()]);
}
