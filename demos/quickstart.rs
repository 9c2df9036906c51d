use safetime::{
    CivilDateTime, DisambiguationPolicy, Duration, GapPolicy, Instant, OverlapPolicy,
    TimeZoneRules, TzdbSource, ZonedDateTime,
};

fn main() -> Result<(), safetime::Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let source = TzdbSource::new()
        .with_zones(["Europe/Berlin", "America/New_York", "Asia/Tokyo"])
        .with_years(2020..=2035);
    let rules = TimeZoneRules::from_source(&source)?;
    let snapshot = rules.snapshot();

    let now = Instant::now();
    println!("now:        {}", now.to_rfc3339());
    println!("unix ms:    {}", now.to_unix_millis_floor()?);
    for name in ["Europe/Berlin", "America/New_York", "Asia/Tokyo"] {
        let zone = snapshot.zone(name)?;
        let here = ZonedDateTime::from_instant(now, &zone, &snapshot)?;
        println!("{name:<17} {}", here.to_rfc9557());
    }

    let new_york = snapshot.zone("America/New_York")?;
    let skipped = CivilDateTime::new(2024, 3, 10, 2, 30, 0, 0)?;
    match ZonedDateTime::from_civil(skipped, &new_york, DisambiguationPolicy::strict(), &snapshot) {
        Ok(z) => println!("unexpected: {}", z.to_rfc9557()),
        Err(err) => println!("strict:     {err}"),
    }
    let lenient = DisambiguationPolicy::new(GapPolicy::EarlierOffset, OverlapPolicy::PreferEarlier);
    let resolved = ZonedDateTime::from_civil(skipped, &new_york, lenient, &snapshot)?;
    println!("lenient:    {}", resolved.to_rfc9557());

    let day_later = resolved.checked_add_duration(Duration::from_hours(24)?, &snapshot)?;
    println!("+24h:       {}", day_later.to_rfc9557());
    Ok(())
}
