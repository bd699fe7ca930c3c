//! Advice tables
//!
//! General advice per air quality category and condition-specific advice per
//! (health condition, category) pair. Both tables are exhaustive `match`
//! expressions, so a new category or condition does not compile until every
//! table covers it.

use crate::category::AqiCategory;
use crate::profile::HealthCondition;

/// General advice for an air quality category, in display order
pub fn recommendations_for(category: AqiCategory) -> &'static [&'static str] {
    match category {
        AqiCategory::Good => &[
            "Enjoy outdoor activities",
            "Perfect air quality for exercising outside",
            "No restrictions on outdoor activities",
        ],
        AqiCategory::Moderate => &[
            "Sensitive individuals should consider reducing prolonged outdoor exertion",
            "It's a good day for most outdoor activities",
            "Consider morning or evening for strenuous exercises",
        ],
        AqiCategory::Unhealthy => &[
            "People with respiratory or heart disease, the elderly and children should limit prolonged outdoor exertion",
            "Consider rescheduling strenuous outdoor activities",
            "Keep windows closed to prevent outdoor air pollution from coming inside",
        ],
        AqiCategory::VeryUnhealthy => &[
            "Avoid prolonged or heavy exertion",
            "Move activities indoors or reschedule to a time when the air quality is better",
            "Use air purifiers indoors to maintain clean air",
            "Wear a mask if you must go outside",
        ],
        AqiCategory::Hazardous => &[
            "Avoid all physical activity outdoors",
            "Remain indoors with windows and doors closed",
            "Use air purifiers with HEPA filters",
            "Wear a properly fitted N95 mask if you must go outside",
            "Follow public health advice and stay informed",
        ],
    }
}

/// Advice for a health condition at an air quality category.
///
/// With no condition this is the general advice for the category.
pub fn health_recommendations_for(
    condition: HealthCondition,
    category: AqiCategory,
) -> &'static [&'static str] {
    use AqiCategory as C;

    match condition {
        HealthCondition::None => recommendations_for(category),
        HealthCondition::Asthma => match category {
            C::Good => &[
                "Air quality is ideal for outdoor activity",
                "Keep your reliever inhaler with you as usual",
            ],
            C::Moderate => &[
                "Carry your reliever inhaler during outdoor activity",
                "Warm up gradually and watch for wheezing or chest tightness",
                "Prefer lower-intensity exercise if symptoms appear",
            ],
            C::Unhealthy => &[
                "Limit outdoor exertion and keep your reliever inhaler close",
                "Follow your asthma action plan if symptoms increase",
                "Keep windows closed and exercise indoors where possible",
            ],
            C::VeryUnhealthy => &[
                "Avoid outdoor activity",
                "Take controller medication exactly as prescribed",
                "Run an air purifier in the room where you spend the most time",
                "Seek medical help if your reliever is not controlling symptoms",
            ],
            C::Hazardous => &[
                "Stay indoors with windows and doors closed",
                "Follow your asthma action plan and have your reliever within reach",
                "Contact your healthcare provider if symptoms worsen",
                "Call emergency services for severe breathing difficulty",
            ],
        },
        HealthCondition::Bronchitis => match category {
            C::Good => &[
                "Outdoor activity is fine; pace yourself if you are coughing",
                "Stay hydrated to keep airways clear",
            ],
            C::Moderate => &[
                "Keep outdoor exertion light to moderate",
                "Avoid busy roads where exhaust irritates the airways",
            ],
            C::Unhealthy => &[
                "Reduce time outdoors, especially strenuous activity",
                "Watch for increased coughing or mucus production",
                "Keep indoor air clean and humidified",
            ],
            C::VeryUnhealthy => &[
                "Avoid going outside",
                "Use an air purifier and keep windows closed",
                "Contact your healthcare provider if coughing or breathlessness increases",
            ],
            C::Hazardous => &[
                "Remain indoors and avoid any exertion",
                "Keep prescribed medication on hand",
                "Seek medical care promptly for fever, chest pain or breathlessness",
            ],
        },
        HealthCondition::Copd => match category {
            C::Good => &[
                "Good conditions for pulmonary rehabilitation exercise outdoors",
                "Use pursed-lip breathing during exertion as usual",
            ],
            C::Moderate => &[
                "Keep outdoor activity gentle and take frequent rests",
                "Carry your rescue inhaler",
                "Plan activity for the cleanest hours of the day",
            ],
            C::Unhealthy => &[
                "Limit time outdoors and avoid exertion",
                "Keep rescue medication and oxygen (if prescribed) ready",
                "Do breathing exercises indoors instead",
            ],
            C::VeryUnhealthy => &[
                "Stay indoors",
                "Follow your COPD action plan",
                "Use an air purifier with a HEPA filter",
                "Contact your healthcare provider if breathlessness increases",
            ],
            C::Hazardous => &[
                "Do not go outside",
                "Keep windows and doors sealed and run air purification",
                "Follow your COPD action plan and monitor oxygen saturation if you can",
                "Call emergency services for severe breathlessness or confusion",
            ],
        },
        HealthCondition::HeartDisease => match category {
            C::Good => &[
                "Air quality is suitable for your usual exercise routine",
                "Follow your cardiac exercise plan",
            ],
            C::Moderate => &[
                "Moderate your exercise intensity outdoors",
                "Stop and rest if you notice palpitations or unusual fatigue",
            ],
            C::Unhealthy => &[
                "Avoid strenuous outdoor activity",
                "Exercise indoors at a lower intensity",
                "Watch for chest pain, palpitations or shortness of breath",
            ],
            C::VeryUnhealthy => &[
                "Stay indoors and keep physical activity light",
                "Take medications as prescribed",
                "Seek medical help for chest pain or irregular heartbeat",
            ],
            C::Hazardous => &[
                "Remain indoors and avoid exertion",
                "Keep the indoor air filtered",
                "Call emergency services for chest pain, shortness of breath or fainting",
            ],
        },
        HealthCondition::Allergy => match category {
            C::Good => &[
                "Air quality is good; check the pollen count before long outings",
                "Shower and change clothes after extended time outside",
            ],
            C::Moderate => &[
                "Take antihistamines before going out if advised",
                "Wear sunglasses to reduce eye irritation",
            ],
            C::Unhealthy => &[
                "Limit time outdoors",
                "Keep windows closed and use recirculated air in the car",
                "Rinse your nose and eyes after being outside",
            ],
            C::VeryUnhealthy => &[
                "Stay indoors where possible",
                "Run an air purifier and keep windows shut",
                "Wear a mask outside to reduce exposure to irritants",
            ],
            C::Hazardous => &[
                "Stay indoors with filtered air",
                "Wear a properly fitted N95 mask if you must go outside",
                "Contact your healthcare provider if allergy symptoms become severe",
            ],
        },
    }
}
