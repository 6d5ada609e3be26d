use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlossaryEntry {
    #[serde(rename = "Metric")]
    pub label: &'static str,
    #[serde(rename = "Description")]
    pub description: &'static str,
}

const fn entry(label: &'static str, description: &'static str) -> GlossaryEntry {
    GlossaryEntry { label, description }
}

/// Reproduced verbatim next to every rendered or exported table.
pub const GLOSSARY: &[GlossaryEntry] = &[
    entry("Source", "Input file the records came from, extension stripped"),
    entry("L100R", "Bookings per 100 records of the whole source"),
    entry("CTR", "Total dialing attempts divided by bookings; lower is better"),
    entry("Booking rate (%)", "Share of dialing attempts that ended in a booking"),
    entry("Utilization (%)", "Share of records no longer open, postponed or awaiting a callback"),
    entry("Unconsumed (%)", "Share of records still open, postponed or awaiting a callback"),
    entry("Status", "Usage stage of the source derived from utilization"),
    entry("Retry rate (%)", "Share of records awaiting a callback of any kind"),
    entry("System retry rate (%)", "Share of records rescheduled automatically by the dialer"),
    entry("Avg attempts", "Dialing attempts per record"),
    entry("Records", "Number of records in the source"),
    entry("Uncontacted (open)", "Records whose state is still open"),
    entry("Callback (agent)", "Records an agent asked to call back"),
    entry("Callback (system)", "Records postponed or rescheduled by the system"),
    entry("Closed by agent", "Closed records with an outcome recorded by an agent"),
    entry("Closed by system", "Records closed as unreachable, wrong number or without an agent reason"),
    entry("No phone", "Records closed because no phone number was available"),
    entry("Attempts", "Sum of dialing attempts"),
    entry("Bookings", "Records whose last outcome was a booking"),
    entry("Last contact", "Latest last-attempt time in the source"),
    entry("Import date", "Earliest import time in the source"),
    entry("Avg reaction (days)", "Whole days between import date and last contact"),
    entry("CTR alert", "Quality tier by CTR, withheld while utilization is below 40%"),
    entry("Narrative", "Recommendation based on bookings, CTR, booking rate and utilization"),
    entry("Multi-attempt records", "Records dialed more than once"),
    entry("Bookings (multi-attempt)", "Bookings among records dialed more than once"),
    entry("Mean attempt at booking", "Average attempt number at which those bookings happened"),
    entry("Median attempt at booking", "Median attempt number at which those bookings happened"),
    entry("Attempt distribution", "Bookings counted per attempt number"),
    entry("Callbacks (all)", "Records in the source awaiting any callback"),
    entry("Callbacks (system)", "Records in the source awaiting a system callback"),
];
