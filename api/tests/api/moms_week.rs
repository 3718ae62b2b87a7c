use jiff::civil::date;
use payloads::requests::PageRequest;
use payloads::{Reply, WeeklySummary};

use test_helpers::{diary_entry, spawn_app};

fn summary(semana_inicio: jiff::civil::Date, resumen: &str) -> WeeklySummary {
    WeeklySummary {
        semana_inicio,
        resumen: resumen.into(),
        logros: vec!["Dormimos mejor".into()],
        desafios: vec!["Poco tiempo libre".into()],
        emocion_predominante: None,
    }
}

#[tokio::test]
async fn current_week_follows_the_clock() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let alice = app.create_alice_user().await?;
    // mocked "now" is Wednesday 2025-01-01; the week runs Dec 30 - Jan 5
    for (fecha, emocion) in [
        (date(2024, 12, 29), "Triste"),
        (date(2024, 12, 30), "Cansada"),
        (date(2024, 12, 31), "Feliz"),
        (date(2025, 1, 1), "Feliz"),
    ] {
        app.client
            .create_entry(&alice, &diary_entry(fecha, "día", emocion))
            .await?
            .into_result()?;
    }

    let week = app.client.current_week(&alice).await?;
    assert_eq!(week.semana_inicio, date(2024, 12, 30));
    assert_eq!(week.semana_fin, date(2025, 1, 5));
    assert_eq!(week.entradas.len(), 3);
    assert_eq!(week.emocion_predominante.as_deref(), Some("Feliz"));
    assert_eq!(week.resumen, None);

    // one week later the overview is empty
    app.time_source.advance(jiff::Span::new().hours(24 * 7));
    let week = app.client.current_week(&alice).await?;
    assert_eq!(week.semana_inicio, date(2025, 1, 6));
    assert!(week.entradas.is_empty());
    assert_eq!(week.emocion_predominante, None);

    Ok(())
}

#[tokio::test]
async fn summary_is_unique_per_week() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let alice = app.create_alice_user().await?;

    // any day of the week maps to its Monday
    let created = app
        .client
        .create_summary(&alice, &summary(date(2024, 6, 13), "Semana intensa"))
        .await?
        .into_result()?;
    assert_eq!(created.semana_inicio, date(2024, 6, 10));
    assert_eq!(created.semana_fin, date(2024, 6, 16));

    let again = app
        .client
        .create_summary(&alice, &summary(date(2024, 6, 10), "Otra vez"))
        .await?;
    match again {
        Reply::Conflict(conflict) => {
            assert_eq!(conflict.existing_id, Some(created.id.0))
        }
        Reply::Ok(summary) => panic!("Expected a conflict, got {summary:?}"),
    }

    let updated = app
        .client
        .update_summary(&alice, &created.id, &summary(date(2024, 6, 10), "Otra vez"))
        .await?;
    assert_eq!(updated.resumen, "Otra vez");

    let week = app.client.week_of(&alice, date(2024, 6, 16)).await?;
    assert_eq!(week.resumen, Some(updated));

    Ok(())
}

#[tokio::test]
async fn summaries_list_newest_first() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let alice = app.create_alice_user().await?;
    for semana in [date(2024, 6, 3), date(2024, 6, 17), date(2024, 6, 10)] {
        app.client
            .create_summary(&alice, &summary(semana, "resumen"))
            .await?
            .into_result()?;
    }

    let page = app
        .client
        .list_summaries(&alice, &PageRequest::default())
        .await?;
    let weeks: Vec<_> = page.items.iter().map(|s| s.semana_inicio).collect();
    assert_eq!(
        weeks,
        vec![date(2024, 6, 17), date(2024, 6, 10), date(2024, 6, 3)]
    );

    Ok(())
}
