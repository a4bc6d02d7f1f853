/// Ports module defining interfaces for hexagonal architecture
///
/// The analysis core only talks to the outside world (scenario trees, the
/// dependency store, report cache, console) through these traits.
pub mod outbound;
