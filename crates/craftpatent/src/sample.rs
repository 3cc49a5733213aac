/// Example disclosure for trying the service without writing one.
pub const SAMPLE_DISCLOSURE: &str = "INVENTION DISCLOSURE

Title: Smart Water Bottle with Hydration Tracking

Inventor: John Smith
Date: September 13, 2025

FIELD OF THE INVENTION
This invention relates to smart water bottles and hydration monitoring systems.

BACKGROUND OF THE INVENTION
Many people struggle to maintain proper hydration throughout the day. Existing water bottles lack intelligent tracking capabilities, and most hydration apps require manual input, leading to inaccurate tracking and poor user compliance.

SUMMARY OF THE INVENTION
The present invention is a smart water bottle that automatically tracks water consumption using a combination of sensors and provides real-time hydration feedback to users through a mobile application.

DETAILED DESCRIPTION

The smart water bottle comprises:

1. BOTTLE STRUCTURE
- Insulated stainless steel body (500ml capacity)
- BPA-free cap with integrated electronics
- Waterproof seal design

2. SENSOR SYSTEM
- Weight sensor in the base to measure water level changes
- Temperature sensor to track water temperature
- Accelerometer to detect drinking motions
- Ambient light sensor for display adjustment

3. ELECTRONICS
- Microcontroller (ESP32-based)
- Bluetooth 5.0 connectivity
- Rechargeable lithium battery (7-day life)
- LED display ring around the cap showing hydration status

4. SOFTWARE FEATURES
- Automatic consumption detection when user tilts bottle
- Personalized hydration goals based on user profile
- Smart reminders via app notifications
- Water quality tracking (temperature preferences)
- Integration with fitness trackers

5. MOBILE APPLICATION
- Real-time hydration dashboard
- Historical consumption patterns
- Achievement system and rewards";
