use std::collections::BTreeSet;
use std::fmt::Write;

use crate::types::{Event, Mission};

/// Renders missions as a Graphviz digraph. Precondition events point at the
/// missions they unlock; missions point at their payment and at every event
/// they set on completion.
pub fn missions_to_dot(missions: &[Mission]) -> String {
    let mut events: BTreeSet<&Event> = BTreeSet::new();
    for mission in missions {
        if let Some(has) = &mission.to_offer.has {
            events.insert(&has.event);
        }
        if let Some(on_complete) = &mission.on_complete {
            events.extend(on_complete.events.iter());
        }
    }

    let mut out = String::from("digraph G {\n");
    for event in &events {
        let _ = writeln!(
            out,
            "{} [shape=box,fillcolor=lightblue,style=filled]",
            quote(&event.id)
        );
    }
    for mission in missions {
        let _ = writeln!(
            out,
            "{} [shape=box,fillcolor=lightgreen,style=filled]",
            quote(&mission.id)
        );
        if let Some(payment) = mission.on_complete.as_ref().and_then(|c| c.payment) {
            let _ = writeln!(
                out,
                "{} [label={},shape=ellipse,fillcolor=lightyellow,style=filled]",
                quote(&payment_node(mission)),
                quote(&format!("{} credits", payment.amount))
            );
        }
    }

    for mission in missions {
        if let Some(has) = &mission.to_offer.has {
            let _ = writeln!(out, "{} -> {}", quote(&has.event.id), quote(&mission.id));
        }
        let Some(on_complete) = &mission.on_complete else {
            continue;
        };
        if on_complete.payment.is_some() {
            let _ = writeln!(
                out,
                "{} -> {}",
                quote(&mission.id),
                quote(&payment_node(mission))
            );
        }
        for event in &on_complete.events {
            let _ = writeln!(out, "{} -> {}", quote(&mission.id), quote(&event.id));
        }
    }

    out.push_str("}\n");
    out
}

fn payment_node(mission: &Mission) -> String {
    format!("{}: payment", mission.id)
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Has, OnComplete, Payment};

    fn mission(id: &str, has: Option<&str>, payment: Option<i64>, events: &[&str]) -> Mission {
        let mut mission = Mission::new(id);
        mission.to_offer.has = has.map(|h| Has { event: Event::new(h) });
        if payment.is_some() || !events.is_empty() {
            mission.on_complete = Some(OnComplete {
                payment: payment.map(|amount| Payment { amount }),
                events: events.iter().map(|e| Event::new(*e)).collect(),
                conversation: None,
            });
        }
        mission
    }

    #[test]
    fn test_empty_graph() {
        assert_eq!(missions_to_dot(&[]), "digraph G {\n}\n");
    }

    #[test]
    fn test_edges_follow_preconditions_and_effects() {
        let missions = vec![
            mission("Kestrel: Testing", None, Some(2000), &["kestrel: tested"]),
            mission("Kestrel: More Weapons", Some("kestrel: tested"), None, &[]),
        ];
        let dot = missions_to_dot(&missions);
        let lines: Vec<&str> = dot.lines().collect();

        assert_eq!(lines[0], "digraph G {");
        assert_eq!(
            lines[1],
            "\"kestrel: tested\" [shape=box,fillcolor=lightblue,style=filled]"
        );
        assert!(lines.contains(&"\"Kestrel: Testing\" -> \"Kestrel: Testing: payment\""));
        assert!(lines.contains(&"\"Kestrel: Testing\" -> \"kestrel: tested\""));
        assert!(lines.contains(&"\"kestrel: tested\" -> \"Kestrel: More Weapons\""));
        assert!(lines.contains(
            &"\"Kestrel: Testing: payment\" [label=\"2000 credits\",shape=ellipse,fillcolor=lightyellow,style=filled]"
        ));
        assert_eq!(lines.last(), Some(&"}"));
    }

    #[test]
    fn test_events_are_declared_once() {
        let missions = vec![
            mission("A", Some("flag"), None, &[]),
            mission("B", Some("flag"), None, &["flag"]),
        ];
        let dot = missions_to_dot(&missions);
        let declarations = dot
            .lines()
            .filter(|l| l.starts_with("\"flag\" [shape=box"))
            .count();
        assert_eq!(declarations, 1);
    }

    #[test]
    fn test_quotes_are_escaped() {
        let dot = missions_to_dot(&[mission("say \"hi\"", None, None, &[])]);
        assert!(dot.contains("\"say \\\"hi\\\"\" [shape=box"));
    }
}
